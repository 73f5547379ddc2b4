use circular_deque::CircularBuffer;
use std::{cell::RefCell, rc::Rc};

#[derive(Debug)]
struct DropTracker {
  id: i32,
  payload: String,
  log: Rc<RefCell<Vec<i32>>>,
}

impl DropTracker {
  fn new(log: &Rc<RefCell<Vec<i32>>>, id: i32) -> Self {
    Self {
      id,
      payload: format!("payload-{id}"),
      log: Rc::clone(log),
    }
  }
}

impl Clone for DropTracker {
  fn clone(&self) -> Self {
    Self {
      id: self.id + 100,
      payload: self.payload.clone(),
      log: Rc::clone(&self.log),
    }
  }
}

impl Drop for DropTracker {
  fn drop(&mut self) {
    self.log.borrow_mut().push(self.id);
  }
}

fn main() {
  let drops = Rc::new(RefCell::new(Vec::new()));

  {
    let mut buf = CircularBuffer::new();

    // Wrap the live region around the ring and force two reallocations.
    for id in 0..4 {
      buf.push_back(DropTracker::new(&drops, id));
    }
    for id in 4..8 {
      buf.push_front(DropTracker::new(&drops, id));
    }
    assert!(drops.borrow().is_empty());

    let pos = buf.insert(buf.begin() + 3, DropTracker::new(&drops, 8));
    buf[pos].payload.push_str("-inserted");
    let pos = buf.erase(buf.begin() + 6);
    buf[pos].payload.push_str("-after-erase");
    assert_eq!(drops.borrow().as_slice(), &[1]);

    for (idx, elem) in buf.iter_mut().enumerate() {
      elem.payload.push_str(&format!("-{idx}"));
    }

    let copy = buf.clone();
    assert_eq!(copy.len(), buf.len());
    drop(copy);

    let popped = buf.pop_front();
    assert_eq!(popped.as_ref().map(|elem| elem.id), Some(7));
    drop(popped);

    buf.clear();
    assert!(buf.is_empty());
    buf.push_back(DropTracker::new(&drops, 9));
  }

  let mut dropped = drops.borrow().clone();
  dropped.sort();
  let mut expected: Vec<i32> = (0..10).collect();
  // clones of everything but the erased element 1
  expected.extend([0, 2, 3, 4, 5, 6, 7, 8].map(|id| id + 100));
  expected.sort();
  assert_eq!(dropped, expected);
}
