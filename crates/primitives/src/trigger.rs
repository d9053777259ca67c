use crate::ids::WindowId;

/// Arguments carried by a session trigger command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TriggerArgs {
	/// Set when the command only selects a build variant instead of running it.
	pub select: bool,
}

/// A host command that may start a mirroring session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionTrigger {
	/// Window the command ran in.
	pub window: WindowId,
	/// Command name.
	pub command: String,
	/// Command arguments.
	pub args: TriggerArgs,
}

impl SessionTrigger {
	/// Creates a trigger for `command` with default arguments.
	pub fn new(window: WindowId, command: impl Into<String>) -> Self {
		Self {
			window,
			command: command.into(),
			args: TriggerArgs::default(),
		}
	}

	/// Marks the trigger as a variant selection.
	#[must_use]
	pub fn selecting(mut self) -> Self {
		self.args.select = true;
		self
	}
}
