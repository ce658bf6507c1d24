use std::cmp::Ordering;

use ringlist::{ElementArena, Queue, QueueContext, SortOrder, merge_queues};

fn trace_init() -> tracing::dispatcher::DefaultGuard {
    use tracing_subscriber::prelude::*;
    tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::TRACE)
        .with_target(false)
        .with_timer(())
        .set_default()
}

fn queue_of<S: AsRef<str>>(arena: &mut ElementArena, values: &[S]) -> Queue {
    let mut queue = Queue::new(arena).unwrap();
    for value in values {
        queue.insert_tail(arena, value.as_ref()).unwrap();
    }
    queue
}

fn values(queue: &Queue, arena: &ElementArena) -> Vec<String> {
    queue.values(arena).map(str::to_owned).collect()
}

fn numbers(values: &[i64]) -> Vec<String> {
    values.iter().map(i64::to_string).collect()
}

fn numeric(a: &str, b: &str) -> Ordering {
    let a: i64 = a.parse().unwrap();
    let b: i64 = b.parse().unwrap();
    a.cmp(&b)
}

#[test]
fn reverse_k_leaves_partial_block() {
    let _trace = trace_init();
    let mut arena = ElementArena::new();
    let mut queue = queue_of(&mut arena, &numbers(&[1, 2, 3, 4, 5, 6, 7]));

    queue.reverse_k(&mut arena, 3);
    assert_eq!(values(&queue, &arena), numbers(&[3, 2, 1, 6, 5, 4, 7]));
    assert_eq!(queue.size(&arena), 7);
}

#[test]
fn delete_dup_removes_every_duplicate() {
    let _trace = trace_init();
    let mut arena = ElementArena::new();
    let mut queue = queue_of(&mut arena, &numbers(&[1, 1, 2, 3, 3]));

    assert!(queue.delete_dup(&mut arena));
    assert_eq!(values(&queue, &arena), numbers(&[2]));
    assert_eq!(queue.size(&arena), 1);
}

#[test]
fn ascend_keeps_non_decreasing_suffix_chain() {
    let _trace = trace_init();
    let mut arena = ElementArena::new();
    let mut queue = queue_of(&mut arena, &numbers(&[5, 2, 13, 3, 8]));

    assert_eq!(queue.ascend_by(&mut arena, numeric), 3);
    assert_eq!(values(&queue, &arena), numbers(&[2, 3, 8]));
}

#[test]
fn descend_keeps_non_increasing_suffix_chain() {
    let _trace = trace_init();
    let mut arena = ElementArena::new();
    let mut queue = queue_of(&mut arena, &numbers(&[5, 2, 13, 3, 8]));

    assert_eq!(queue.descend_by(&mut arena, numeric), 2);
    assert_eq!(values(&queue, &arena), numbers(&[13, 8]));
}

#[test]
fn merge_two_sorted_queues() {
    let _trace = trace_init();
    let mut arena = ElementArena::new();
    let a = queue_of(&mut arena, &numbers(&[1, 3, 5]));
    let b = queue_of(&mut arena, &numbers(&[2, 4, 6]));
    let mut contexts = [
        QueueContext::new(&arena, a, 0),
        QueueContext::new(&arena, b, 1),
    ];

    assert_eq!(merge_queues(&mut arena, &mut contexts, false), 6);
    assert_eq!(contexts[0].size(), 6);
    assert_eq!(values(contexts[0].queue(), &arena), numbers(&[1, 2, 3, 4, 5, 6]));
    assert_eq!(contexts[1].size(), 0);
    assert!(contexts[1].queue().is_empty(&arena));
}

#[test]
fn sorting_sorted_queue_is_idempotent() {
    let _trace = trace_init();
    let input: Vec<String> = (0..300).map(|i| format!("{i:05}")).collect();
    let mut arena = ElementArena::new();
    let mut queue = queue_of(&mut arena, &input);

    let stats = queue.sort(&mut arena, false);
    assert_eq!(values(&queue, &arena), input);
    assert_eq!(queue.size(&arena), input.len());
    assert_eq!(stats.runs, 1);
}

#[test]
fn sort_is_stable_for_tagged_duplicates() {
    let _trace = trace_init();
    let input = [
        "3#a", "1#a", "2#a", "3#b", "1#b", "3#c", "2#b", "1#c", "2#c", "3#d", "1#d", "2#d",
    ];
    let key = |s: &str| s.split('#').next().unwrap_or_default().to_owned();

    for order in [SortOrder::Ascending, SortOrder::Descending] {
        let mut arena = ElementArena::new();
        let mut queue = queue_of(&mut arena, &input);
        queue.sort_by(&mut arena, order, |a, b| key(a).cmp(&key(b)));

        let mut expected: Vec<String> = input.iter().map(|s| s.to_string()).collect();
        match order {
            SortOrder::Ascending => expected.sort_by_key(|s| key(s.as_str())),
            SortOrder::Descending => {
                expected.sort_by(|a, b| key(b.as_str()).cmp(&key(a.as_str())))
            }
        }
        assert_eq!(values(&queue, &arena), expected, "{order:?}");
    }
}

#[test]
fn pruning_uses_linear_comparisons() {
    let _trace = trace_init();
    const N: i64 = 10_000;
    let rising: Vec<i64> = (0..N).collect();
    let falling: Vec<i64> = (0..N).rev().collect();

    let cases = [
        (&rising, false, N as usize),
        (&falling, false, 1),
        (&rising, true, 1),
        (&falling, true, N as usize),
    ];

    for (input, descend, kept) in cases {
        let mut arena = ElementArena::new();
        let mut queue = queue_of(&mut arena, &numbers(input));
        let mut comparisons = 0usize;
        let counting = |a: &str, b: &str| {
            comparisons += 1;
            numeric(a, b)
        };

        let remaining = if descend {
            queue.descend_by(&mut arena, counting)
        } else {
            queue.ascend_by(&mut arena, counting)
        };

        assert_eq!(remaining, kept);
        assert_eq!(queue.size(&arena), kept);
        assert_eq!(comparisons, N as usize - 1);
    }
}

#[test]
fn removed_elements_belong_to_the_caller() {
    let _trace = trace_init();
    let mut arena = ElementArena::new();
    let mut queue = queue_of(&mut arena, &["alpha", "beta"]);

    let element = queue.remove_tail(&mut arena).unwrap();
    let mut buf = [0u8; 3];
    assert_eq!(element.copy_value_into(&mut buf), 2);
    assert_eq!(&buf, b"be\0");
    assert_eq!(element.into_value(), "beta");

    queue.free(&mut arena);
    assert!(arena.is_empty());
}

// =============================================================================
// Model check against a Vec
// =============================================================================

#[derive(Debug, Clone, Copy)]
enum Op {
    InsertHead(u8),
    InsertTail(u8),
    RemoveHead,
    RemoveTail,
    DeleteMid,
    DeleteDup,
    Swap,
    Reverse,
    ReverseK(usize),
    Sort(bool),
    Ascend,
    Descend,
}

fn op(code: u8, arg: u8) -> Op {
    match code % 12 {
        0 => Op::InsertHead(arg),
        1 => Op::InsertTail(arg),
        2 => Op::RemoveHead,
        3 => Op::RemoveTail,
        4 => Op::DeleteMid,
        5 => Op::DeleteDup,
        6 => Op::Swap,
        7 => Op::Reverse,
        8 => Op::ReverseK(arg as usize),
        9 => Op::Sort(arg % 2 == 1),
        10 => Op::Ascend,
        _ => Op::Descend,
    }
}

fn apply_model(model: &mut Vec<String>, op: Op) {
    match op {
        Op::InsertHead(v) => model.insert(0, v.to_string()),
        Op::InsertTail(v) => model.push(v.to_string()),
        Op::RemoveHead => {
            if !model.is_empty() {
                model.remove(0);
            }
        }
        Op::RemoveTail => {
            model.pop();
        }
        Op::DeleteMid => {
            if !model.is_empty() {
                model.remove(model.len() / 2);
            }
        }
        Op::DeleteDup => {
            let mut kept = Vec::new();
            for (i, v) in model.iter().enumerate() {
                let same_prev = i > 0 && model[i - 1] == *v;
                let same_next = i + 1 < model.len() && model[i + 1] == *v;
                if !same_prev && !same_next {
                    kept.push(v.clone());
                }
            }
            *model = kept;
        }
        Op::Swap => model.chunks_exact_mut(2).for_each(|pair| pair.swap(0, 1)),
        Op::Reverse => model.reverse(),
        Op::ReverseK(k) => {
            if k >= 2 {
                model.chunks_exact_mut(k).for_each(<[String]>::reverse);
            }
        }
        Op::Sort(descend) => {
            if descend {
                model.sort_by(|a, b| b.cmp(a));
            } else {
                model.sort();
            }
        }
        Op::Ascend | Op::Descend => {
            let mut kept: Vec<String> = Vec::new();
            for v in model.iter().rev() {
                let drop = kept.last().is_some_and(|best| match op {
                    Op::Ascend => v > best,
                    _ => v < best,
                });
                if !drop {
                    kept.push(v.clone());
                }
            }
            kept.reverse();
            *model = kept;
        }
    }
}

fn apply_queue(queue: &mut Queue, arena: &mut ElementArena, op: Op) {
    match op {
        Op::InsertHead(v) => queue.insert_head(arena, &v.to_string()).unwrap(),
        Op::InsertTail(v) => queue.insert_tail(arena, &v.to_string()).unwrap(),
        Op::RemoveHead => {
            queue.remove_head(arena);
        }
        Op::RemoveTail => {
            queue.remove_tail(arena);
        }
        Op::DeleteMid => {
            queue.delete_mid(arena);
        }
        Op::DeleteDup => {
            queue.delete_dup(arena);
        }
        Op::Swap => queue.swap(arena),
        Op::Reverse => queue.reverse(arena),
        Op::ReverseK(k) => queue.reverse_k(arena, k),
        Op::Sort(descend) => {
            queue.sort(arena, descend);
        }
        Op::Ascend => {
            queue.ascend(arena);
        }
        Op::Descend => {
            queue.descend(arena);
        }
    }
}

proptest::proptest! {
    #[test]
    fn queue_matches_vec_model(ops in proptest::collection::vec((0u8..12, 0u8..6), 0..80)) {
        let _trace = trace_init();
        let mut arena = ElementArena::new();
        let mut queue = Queue::new(&mut arena).unwrap();
        let mut model: Vec<String> = Vec::new();

        for (i, &(code, arg)) in ops.iter().enumerate() {
            let op = op(code, arg);
            let _span = tracing::info_span!("op", ?i, ?op).entered();
            apply_model(&mut model, op);
            apply_queue(&mut queue, &mut arena, op);

            proptest::prop_assert_eq!(values(&queue, &arena), model.clone());
            proptest::prop_assert_eq!(queue.size(&arena), model.len());
            // Two sentinels plus one slot per element.
            proptest::prop_assert_eq!(arena.len(), model.len() + 2);
        }
    }
}
