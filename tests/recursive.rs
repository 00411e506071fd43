mod common;

use common::track;
use pretty_assertions::assert_eq;
use value_box::ValueBox;

const DEPTH: u32 = 1000;

#[derive(Clone, Debug)]
struct Node {
    value: u32,
    next: ValueBox<Node>,
}

fn list(len: u32) -> ValueBox<Node> {
    let mut head = ValueBox::<Node>::empty();
    for value in (0..len).rev() {
        head = ValueBox::new(Node { value, next: head });
    }
    head
}

fn values(list: &ValueBox<Node>) -> Vec<u32> {
    let mut out = Vec::new();
    let mut cursor = list;
    while let Some(node) = cursor.get() {
        out.push(node.value);
        cursor = &node.next;
    }
    out
}

#[derive(Clone, Debug)]
struct Tree {
    value: u32,
    left: ValueBox<Tree>,
    right: ValueBox<Tree>,
}

impl Tree {
    fn leaf(value: u32) -> Self {
        Self {
            value,
            left: ValueBox::empty(),
            right: ValueBox::empty(),
        }
    }

    /// A left spine of `depth` nodes, each with a leaf on its right.
    fn comb(depth: u32) -> Self {
        let mut tree = Self::leaf(0);
        for level in 1..depth {
            tree = Self {
                value: level,
                left: ValueBox::new(tree),
                right: ValueBox::new(Self::leaf(level + DEPTH)),
            };
        }
        tree
    }

    fn sum(&self) -> u64 {
        let mut total = 0;
        let mut pending = vec![self];
        while let Some(tree) = pending.pop() {
            total += u64::from(tree.value);
            pending.extend(tree.left.get());
            pending.extend(tree.right.get());
        }
        total
    }

    fn height(&self) -> u32 {
        let mut height = 1;
        let mut cursor = self;
        while let Some(left) = cursor.left.get() {
            height += 1;
            cursor = left;
        }
        height
    }
}

fn assert_clone<T: Clone>() {}
fn assert_send_sync<T: Send + Sync>() {}

#[test]
fn recursive_boxes_are_clone_and_thread_safe() {
    assert_clone::<ValueBox<Node>>();
    assert_clone::<ValueBox<Tree>>();
    assert_send_sync::<ValueBox<Node>>();
}

#[test]
fn deep_list_copies_and_drops() {
    let (copied, stats) = track(|| {
        let original = list(DEPTH);
        let mut copy = original.clone();

        copy.get_mut().unwrap().value = 42;
        assert_eq!(values(&original)[0], 0);
        assert_eq!(values(&copy)[0], 42);
        assert_eq!(values(&original)[1..], values(&copy)[1..]);

        values(&copy).len()
    });
    assert_eq!(copied, DEPTH as usize);
    assert!(stats.allocated >= 2 * DEPTH as usize);
    assert_eq!(stats.freed, stats.allocated);
}

#[test]
fn deep_tree_copies_and_drops() {
    let ((), stats) = track(|| {
        let tree = Tree::comb(DEPTH);
        let copy = tree.clone();

        assert_eq!(copy.height(), DEPTH);
        assert_eq!(copy.sum(), tree.sum());

        let mut target = ValueBox::new(Tree::leaf(7));
        target.clone_from(&ValueBox::new(copy));
        assert_eq!(target.sum(), tree.sum());
    });
    assert_eq!(stats.freed, stats.allocated);
}

#[test]
fn subtrees_move_without_copying() {
    let mut tree = Tree::comb(4);
    let right = tree.right.take();

    assert!(tree.right.is_empty());
    assert_eq!(right.value, 3 + DEPTH);

    tree.left.get_mut().unwrap().right.set(Tree::leaf(9));
    assert_eq!(tree.left.right.value, 9);
}

/// A singly linked list whose destructor unlinks iteratively.
struct Chain {
    next: ValueBox<Chain>,
}

impl Drop for Chain {
    fn drop(&mut self) {
        let mut next = self.next.take();
        while let Some(node) = next.get_mut() {
            let following = node.next.take();
            next = following;
        }
    }
}

#[test]
fn long_chains_can_unlink_iteratively() {
    let ((), stats) = track(|| {
        let mut head = ValueBox::<Chain>::empty();
        for _ in 0..100_000 {
            head = ValueBox::new(Chain { next: head });
        }
        drop(head);
    });
    assert_eq!(stats.allocated, 100_000);
    assert_eq!(stats.freed, 100_000);
}
