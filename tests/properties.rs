use circular_deque::CircularBuffer;
use proptest::prelude::*;
use std::collections::VecDeque;

#[derive(Debug, Clone)]
enum Op {
  PushBack(i32),
  PushFront(i32),
  PopBack,
  PopFront,
  Insert(usize, i32),
  Erase(usize),
  Clear,
}

fn op() -> impl Strategy<Value = Op> {
  prop_oneof![
    4 => any::<i32>().prop_map(Op::PushBack),
    4 => any::<i32>().prop_map(Op::PushFront),
    2 => Just(Op::PopBack),
    2 => Just(Op::PopFront),
    3 => (any::<usize>(), any::<i32>()).prop_map(|(at, v)| Op::Insert(at, v)),
    2 => any::<usize>().prop_map(Op::Erase),
    1 => Just(Op::Clear),
  ]
}

fn assert_matches(buf: &CircularBuffer<i32>, model: &VecDeque<i32>) {
  assert_eq!(buf.len(), model.len());
  for (i, expected) in model.iter().enumerate() {
    assert_eq!(buf[i], *expected);
  }
  assert!(buf.iter().eq(model.iter()));
  assert!(buf.iter().rev().eq(model.iter().rev()));
}

proptest! {
  #![proptest_config(ProptestConfig::with_cases(256))]

  #[test]
  fn prop_matches_vecdeque_model(ops in prop::collection::vec(op(), 0..200)) {
    let mut buf = CircularBuffer::new();
    let mut model = VecDeque::new();

    for op in ops {
      match op {
        Op::PushBack(v) => {
          buf.push_back(v);
          model.push_back(v);
        }
        Op::PushFront(v) => {
          buf.push_front(v);
          model.push_front(v);
        }
        Op::PopBack => {
          prop_assert_eq!(buf.pop_back(), model.pop_back());
        }
        Op::PopFront => {
          prop_assert_eq!(buf.pop_front(), model.pop_front());
        }
        Op::Insert(at, v) => {
          let at = at % (model.len() + 1);
          let pos = buf.insert(buf.begin() + at, v);
          model.insert(at, v);
          prop_assert_eq!(buf[pos], v);
        }
        Op::Erase(at) => {
          if model.is_empty() {
            continue;
          }
          let at = at % model.len();
          let next = buf.erase(buf.begin() + at);
          model.remove(at);
          match model.get(at) {
            Some(v) => {
              prop_assert_eq!(buf[next], *v);
            }
            None => {
              prop_assert_eq!(next, buf.end());
            }
          }
        }
        Op::Clear => {
          buf.clear();
          model.clear();
          prop_assert_eq!(buf.capacity(), 0);
        }
      }

      prop_assert!(buf.capacity() == 0 || buf.len() < buf.capacity());
      assert_matches(&buf, &model);
    }
  }

  #[test]
  fn prop_clone_is_isolated(
    items in prop::collection::vec(any::<i32>(), 0..64),
    front in prop::collection::vec(any::<i32>(), 0..16),
  ) {
    let mut original = CircularBuffer::new();
    for v in front.iter().rev() {
      original.push_front(*v);
    }
    original.extend(items.iter().copied());
    let snapshot: Vec<i32> = original.iter().copied().collect();

    let mut copy = original.clone();
    prop_assert_eq!(&copy, &original);
    copy.push_back(1);
    copy.push_front(2);
    if !copy.is_empty() {
      copy[0] = 3;
    }
    while copy.len() > 3 {
      copy.erase(copy.begin() + copy.len() / 2);
    }

    prop_assert_eq!(original, snapshot);
  }

  #[test]
  fn prop_insert_then_erase_restores(
    items in prop::collection::vec(any::<u8>(), 0..48),
    rotate in 0usize..48,
    at in any::<usize>(),
    value in any::<u8>(),
  ) {
    let mut buf: CircularBuffer<u8> = items.iter().copied().collect();
    // Rotate the live region through the ring so it wraps.
    for _ in 0..rotate {
      if let Some(v) = buf.pop_front() {
        buf.push_back(v);
      }
    }
    let before: Vec<u8> = buf.iter().copied().collect();

    let at = at % (buf.len() + 1);
    let pos = buf.insert(buf.begin() + at, value);
    prop_assert_eq!(buf[pos], value);
    buf.erase(pos);

    prop_assert_eq!(buf, before);
  }

  #[test]
  fn prop_positions_order_by_logical_index(
    len in 1usize..40,
    rotate in 0usize..40,
    a in any::<usize>(),
    b in any::<usize>(),
  ) {
    let mut buf: CircularBuffer<usize> = (0..len).collect();
    for _ in 0..rotate {
      if let Some(v) = buf.pop_front() {
        buf.push_back(v);
      }
    }
    let (a, b) = (a % (len + 1), b % (len + 1));
    let (pa, pb) = (buf.begin() + a, buf.begin() + b);

    prop_assert_eq!(pa.partial_cmp(&pb), Some(a.cmp(&b)));
    prop_assert_eq!(pb - pa, b as isize - a as isize);
    prop_assert_eq!(pa.offset_from(buf.begin()), Some(a as isize));
  }
}
