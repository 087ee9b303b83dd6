//! Reversible commands.
//!
//! A [`Command`] mutates a state and remembers whatever it overwrote, so that
//! [`undo`](Command::undo) can put it back. Commands are one-shot transaction
//! objects: the captured values belong to the execution they were taken
//! from. Undoing a command that never executed is a no-op; re-executing after
//! an undo (redo) recaptures.
//!
//! [`BatchCommand`] groups commands into one step. It executes front-to-back
//! and undoes back-to-front.

use serde::{Deserialize, Serialize};

/// A reversible mutation of a state `S`.
///
/// For the state instance a command was executed against,
/// `undo(execute(s)) == s`.
pub trait Command<S> {
    /// Applies the mutation, capturing the values it overwrites.
    fn execute(&mut self, state: &mut S);

    /// Restores the values captured by the last [`execute`](Self::execute).
    fn undo(&mut self, state: &mut S);

    /// Short human-readable label, used in logs and history listings.
    fn describe(&self) -> String {
        std::any::type_name::<Self>()
            .rsplit("::")
            .next()
            .unwrap_or("command")
            .to_string()
    }
}

impl<S, C: Command<S> + ?Sized> Command<S> for Box<C> {
    fn execute(&mut self, state: &mut S) {
        (**self).execute(state);
    }

    fn undo(&mut self, state: &mut S) {
        (**self).undo(state);
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// An ordered composite command.
///
/// Members can be appended after construction, which is how one
/// visualization step is assembled from several primitive edits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchCommand<C> {
    commands: Vec<C>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

impl<C> Default for BatchCommand<C> {
    fn default() -> Self {
        BatchCommand::new()
    }
}

impl<C> BatchCommand<C> {
    pub fn new() -> Self {
        BatchCommand {
            commands: Vec::new(),
            description: None,
        }
    }

    pub fn from_commands(commands: Vec<C>) -> Self {
        BatchCommand {
            commands,
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Appends a member command.
    pub fn push(&mut self, command: C) {
        self.commands.push(command);
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, C> {
        self.commands.iter()
    }

    pub fn into_inner(self) -> Vec<C> {
        self.commands
    }
}

impl<C> Extend<C> for BatchCommand<C> {
    fn extend<I: IntoIterator<Item = C>>(&mut self, iter: I) {
        self.commands.extend(iter);
    }
}

impl<C> FromIterator<C> for BatchCommand<C> {
    fn from_iter<I: IntoIterator<Item = C>>(iter: I) -> Self {
        BatchCommand::from_commands(iter.into_iter().collect())
    }
}

impl<'a, C> IntoIterator for &'a BatchCommand<C> {
    type Item = &'a C;
    type IntoIter = std::slice::Iter<'a, C>;

    fn into_iter(self) -> Self::IntoIter {
        self.commands.iter()
    }
}

impl<S, C: Command<S>> Command<S> for BatchCommand<C> {
    fn execute(&mut self, state: &mut S) {
        for command in self.commands.iter_mut() {
            command.execute(state);
        }
    }

    /// Later members are reverted before earlier ones.
    fn undo(&mut self, state: &mut S) {
        for command in self.commands.iter_mut().rev() {
            command.undo(state);
        }
    }

    fn describe(&self) -> String {
        match &self.description {
            Some(description) => description.clone(),
            None => format!("batch of {}", self.commands.len()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Pushes a value onto a vector; undo pops it back off.
    struct Append(i32);

    impl Command<Vec<i32>> for Append {
        fn execute(&mut self, state: &mut Vec<i32>) {
            state.push(self.0);
        }

        fn undo(&mut self, state: &mut Vec<i32>) {
            state.pop();
        }
    }

    /// Overwrites the last element, remembering the old one.
    struct SetLast {
        value: i32,
        previous: Option<i32>,
    }

    impl Command<Vec<i32>> for SetLast {
        fn execute(&mut self, state: &mut Vec<i32>) {
            if let Some(last) = state.last_mut() {
                self.previous = Some(std::mem::replace(last, self.value));
            }
        }

        fn undo(&mut self, state: &mut Vec<i32>) {
            if let (Some(previous), Some(last)) = (self.previous.take(), state.last_mut()) {
                *last = previous;
            }
        }
    }

    #[test]
    fn batch_executes_in_order_and_undoes_in_reverse() {
        let mut batch: BatchCommand<Box<dyn Command<Vec<i32>>>> = BatchCommand::new();
        batch.push(Box::new(Append(1)));
        batch.push(Box::new(SetLast {
            value: 7,
            previous: None,
        }));
        batch.push(Box::new(Append(2)));

        let mut state = vec![0];
        batch.execute(&mut state);
        assert_eq!(state, vec![0, 7, 2]);

        // SetLast depends on Append(1) having run; reverse order keeps it sound.
        batch.undo(&mut state);
        assert_eq!(state, vec![0]);
    }

    #[test]
    fn undo_before_execute_is_noop() {
        let mut command = SetLast {
            value: 3,
            previous: None,
        };
        let mut state = vec![1];
        command.undo(&mut state);
        assert_eq!(state, vec![1]);
    }

    #[test]
    fn batch_can_grow_after_construction() {
        let mut batch: BatchCommand<Append> = [Append(1)].into_iter().collect();
        batch.extend([Append(2), Append(3)]);
        assert_eq!(batch.len(), 3);

        let mut state = Vec::new();
        batch.execute(&mut state);
        assert_eq!(state, vec![1, 2, 3]);

        let members: Vec<i32> = batch.into_inner().into_iter().map(|a| a.0).collect();
        assert_eq!(members, vec![1, 2, 3]);
    }

    #[test]
    fn describe_labels() {
        let batch = BatchCommand::from_commands(vec![Append(1)]);
        assert_eq!(Command::<Vec<i32>>::describe(&batch), "batch of 1");
        let batch = batch.with_description("step 1");
        assert_eq!(Command::<Vec<i32>>::describe(&batch), "step 1");
        assert_eq!(Command::<Vec<i32>>::describe(&Append(1)), "Append");
    }
}
