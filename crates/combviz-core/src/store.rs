//! Undo/redo store.
//!
//! [`UndoRedoStore`] owns a state value plus two command stacks:
//! `history` (executed, oldest first) and `redo_stack` (undone, most recent
//! on top). The two are always disjoint. Executing a fresh command discards
//! the redo stack; undo and redo only move commands between the stacks, so
//! `history_len() + redo_len()` never shrinks across undo/redo.
//!
//! The state is exclusively owned by the store and only changes through
//! [`execute`](UndoRedoStore::execute), [`undo`](UndoRedoStore::undo),
//! [`redo`](UndoRedoStore::redo), their `_all` variants and
//! [`update_state`](UndoRedoStore::update_state). Every mutating method takes
//! `&mut self`; sharing a store across threads needs an outer lock.

use std::fmt;

use crate::command::Command;

/// Handle returned by [`UndoRedoStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Observer<S> = Box<dyn FnMut(&S)>;

/// Owner of a mutable state and its command history.
pub struct UndoRedoStore<S, C = Box<dyn Command<S>>> {
    state: S,
    history: Vec<C>,
    redo_stack: Vec<C>,
    observers: Vec<(SubscriptionId, Observer<S>)>,
    next_subscription: u64,
}

impl<S, C: Command<S>> UndoRedoStore<S, C> {
    pub fn new(state: S) -> Self {
        UndoRedoStore {
            state,
            history: Vec::new(),
            redo_stack: Vec::new(),
            observers: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Creates a store positioned at the start of a pre-built trace.
    ///
    /// `steps` are in execution order; each [`redo`](Self::redo) applies the
    /// next one, each [`undo`](Self::undo) steps back.
    pub fn replay(state: S, steps: Vec<C>) -> Self {
        let mut store = UndoRedoStore::new(state);
        store.set_redo_stack(steps.into_iter().rev().collect());
        store
    }

    // -----------------------------------------------------------------------
    // Read-only accessors
    // -----------------------------------------------------------------------

    pub fn state(&self) -> &S {
        &self.state
    }

    /// Executed commands, oldest first.
    pub fn history(&self) -> &[C] {
        &self.history
    }

    /// Undone commands; the last element is redone next.
    pub fn redo_stack(&self) -> &[C] {
        &self.redo_stack
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn total_commands(&self) -> usize {
        self.history.len() + self.redo_stack.len()
    }

    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn into_state(self) -> S {
        self.state
    }

    // -----------------------------------------------------------------------
    // Mutation
    // -----------------------------------------------------------------------

    /// Executes a new command and records it. Clears the redo stack.
    pub fn execute(&mut self, mut command: C) {
        command.execute(&mut self.state);
        tracing::trace!(
            command = %command.describe(),
            discarded = self.redo_stack.len(),
            "execute"
        );
        self.history.push(command);
        self.redo_stack.clear();
        self.notify();
    }

    /// Reverts the most recent command. Returns `false` when there is
    /// nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(mut command) = self.history.pop() else {
            return false;
        };
        command.undo(&mut self.state);
        tracing::trace!(
            command = %command.describe(),
            history = self.history.len(),
            "undo"
        );
        self.redo_stack.push(command);
        self.notify();
        true
    }

    /// Re-applies the most recently undone command. Returns `false` when the
    /// redo stack is empty.
    pub fn redo(&mut self) -> bool {
        let Some(mut command) = self.redo_stack.pop() else {
            return false;
        };
        command.execute(&mut self.state);
        tracing::trace!(
            command = %command.describe(),
            remaining = self.redo_stack.len(),
            "redo"
        );
        self.history.push(command);
        self.notify();
        true
    }

    /// Undoes every command, one step at a time. Returns the step count.
    pub fn undo_all(&mut self) -> usize {
        let mut steps = 0;
        while self.undo() {
            steps += 1;
        }
        steps
    }

    /// Redoes every command, one step at a time. Returns the step count.
    pub fn redo_all(&mut self) -> usize {
        let mut steps = 0;
        while self.redo() {
            steps += 1;
        }
        steps
    }

    /// Applies `update` directly to the state, outside of undo/redo history.
    pub fn update_state(&mut self, update: impl FnOnce(&mut S)) {
        update(&mut self.state);
        self.notify();
    }

    /// Replaces the executed history, oldest first. The last element is
    /// undone first. The state is not touched: `history` must already be
    /// reflected in it.
    pub fn set_history(&mut self, history: Vec<C>) {
        self.history = history;
    }

    /// Replaces the redo stack. The last element is redone first.
    pub fn set_redo_stack(&mut self, redo_stack: Vec<C>) {
        self.redo_stack = redo_stack;
    }

    // -----------------------------------------------------------------------
    // Observers
    // -----------------------------------------------------------------------

    /// Registers a callback invoked with the new state after every change.
    pub fn subscribe(&mut self, observer: impl FnMut(&S) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Removes a callback. Returns whether it was registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(existing, _)| *existing != id);
        self.observers.len() != before
    }

    fn notify(&mut self) {
        for (_, observer) in self.observers.iter_mut() {
            observer(&self.state);
        }
    }
}

impl<S: fmt::Debug, C> fmt::Debug for UndoRedoStore<S, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UndoRedoStore")
            .field("state", &self.state)
            .field("history", &self.history.len())
            .field("redo_stack", &self.redo_stack.len())
            .field("observers", &self.observers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Adds to a counter; undo subtracts.
    #[derive(Debug, Clone)]
    struct Add(i64);

    impl Command<i64> for Add {
        fn execute(&mut self, state: &mut i64) {
            *state += self.0;
        }

        fn undo(&mut self, state: &mut i64) {
            *state -= self.0;
        }
    }

    fn store_with(values: &[i64]) -> UndoRedoStore<i64, Add> {
        let mut store = UndoRedoStore::new(0);
        for &v in values {
            store.execute(Add(v));
        }
        store
    }

    #[test]
    fn undo_redo_walks_history() {
        let mut store = store_with(&[1, 2, 3]);
        assert_eq!(*store.state(), 6);

        assert!(store.undo());
        assert_eq!(*store.state(), 3);
        assert_eq!((store.history_len(), store.redo_len()), (2, 1));

        assert!(store.redo());
        assert_eq!(*store.state(), 6);
        assert_eq!((store.history_len(), store.redo_len()), (3, 0));
    }

    #[test]
    fn empty_stacks_are_noops() {
        let mut store: UndoRedoStore<i64, Add> = UndoRedoStore::new(5);
        assert!(!store.undo());
        assert!(!store.redo());
        assert_eq!(*store.state(), 5);
    }

    #[test]
    fn execute_discards_undone_branch() {
        let mut store = store_with(&[1, 2]);
        store.undo();
        assert_eq!(store.redo_len(), 1);

        store.execute(Add(10));
        assert_eq!(store.redo_len(), 0);
        assert_eq!(*store.state(), 11);
        assert!(!store.redo());
    }

    #[test]
    fn undo_all_and_redo_all_notify_per_step() {
        let mut store = store_with(&[1, 2, 3]);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        store.subscribe(move |state| sink.borrow_mut().push(*state));

        assert_eq!(store.undo_all(), 3);
        assert_eq!(*store.state(), 0);
        assert_eq!(store.redo_all(), 3);
        assert_eq!(*store.state(), 6);
        assert_eq!(*seen.borrow(), vec![3, 1, 0, 1, 3, 6]);
    }

    #[test]
    fn update_state_bypasses_history() {
        let mut store = store_with(&[1]);
        store.update_state(|state| *state = 100);
        assert_eq!(store.total_commands(), 1);

        store.undo();
        assert_eq!(*store.state(), 99);
    }

    #[test]
    fn unsubscribe_stops_notifications() {
        let mut store: UndoRedoStore<i64, Add> = UndoRedoStore::new(0);
        let count = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&count);
        let id = store.subscribe(move |_| *sink.borrow_mut() += 1);

        store.execute(Add(1));
        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        store.execute(Add(1));
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn replay_steps_forward_from_first_command() {
        let mut store = UndoRedoStore::replay(0, vec![Add(1), Add(10), Add(100)]);
        assert_eq!(store.redo_len(), 3);

        store.redo();
        assert_eq!(*store.state(), 1);
        store.redo();
        assert_eq!(*store.state(), 11);
        store.undo();
        assert_eq!(*store.state(), 1);
    }

    #[test]
    fn boxed_commands_are_the_default() {
        let mut store: UndoRedoStore<i64> = UndoRedoStore::new(0);
        store.execute(Box::new(Add(4)));
        store.undo();
        assert_eq!(*store.state(), 0);
    }

    #[test]
    fn can_undo_and_can_redo_track_stacks() {
        let mut store = store_with(&[2]);
        assert!(store.can_undo());
        assert!(!store.can_redo());

        store.undo();
        assert!(!store.can_undo());
        assert!(store.can_redo());
        assert_eq!(store.into_state(), 0);
    }

    #[test]
    fn set_history_restores_a_saved_session() {
        let mut store: UndoRedoStore<i64, Add> = UndoRedoStore::new(3);
        store.set_history(vec![Add(1), Add(2)]);
        store.set_redo_stack(vec![Add(4)]);
        assert_eq!((store.history_len(), store.redo_len()), (2, 1));

        store.undo_all();
        assert_eq!(*store.state(), 0);
        store.redo_all();
        assert_eq!(*store.state(), 7);
    }

    /// An [`Add`] with an identity, so stack membership can be checked.
    #[derive(Debug, Clone)]
    struct Tagged {
        tag: usize,
        amount: i64,
    }

    impl Command<i64> for Tagged {
        fn execute(&mut self, state: &mut i64) {
            *state += self.amount;
        }

        fn undo(&mut self, state: &mut i64) {
            *state -= self.amount;
        }
    }

    #[derive(Debug, Clone)]
    enum Op {
        Undo,
        Redo,
        UndoAll,
        RedoAll,
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            3 => Just(Op::Undo),
            3 => Just(Op::Redo),
            1 => Just(Op::UndoAll),
            1 => Just(Op::RedoAll),
        ]
    }

    proptest! {
        #[test]
        fn undo_redo_never_loses_commands(
            values in prop::collection::vec(-50i64..50, 0..20),
            ops in prop::collection::vec(op(), 0..40),
        ) {
            let mut store = store_with(&values);
            let total = store.total_commands();

            for op in ops {
                let before = store.total_commands();
                match op {
                    Op::Undo => { store.undo(); }
                    Op::Redo => { store.redo(); }
                    Op::UndoAll => { store.undo_all(); }
                    Op::RedoAll => { store.redo_all(); }
                }
                prop_assert!(store.total_commands() >= before);
                prop_assert_eq!(store.total_commands(), total);

                // The state always equals the sum of the executed prefix.
                let applied: i64 = values[..store.history_len()].iter().sum();
                prop_assert_eq!(*store.state(), applied);
            }
        }

        #[test]
        fn history_and_redo_stack_stay_disjoint(
            values in prop::collection::vec(-50i64..50, 0..20),
            ops in prop::collection::vec(op(), 0..40),
        ) {
            let mut store: UndoRedoStore<i64, Tagged> = UndoRedoStore::new(0);
            for (tag, &amount) in values.iter().enumerate() {
                store.execute(Tagged { tag, amount });
            }

            for op in ops {
                match op {
                    Op::Undo => { store.undo(); }
                    Op::Redo => { store.redo(); }
                    Op::UndoAll => { store.undo_all(); }
                    Op::RedoAll => { store.redo_all(); }
                }

                let done: Vec<usize> = store.history().iter().map(|c| c.tag).collect();
                let undone: Vec<usize> = store.redo_stack().iter().map(|c| c.tag).collect();
                prop_assert!(done.iter().all(|tag| !undone.contains(tag)));

                // History is a prefix in execution order; the redo stack holds
                // the rest with the next command to redo on top.
                let mut all = done.clone();
                all.extend(undone.iter().rev());
                prop_assert_eq!(all, (0..values.len()).collect::<Vec<_>>());
            }
        }
    }
}
