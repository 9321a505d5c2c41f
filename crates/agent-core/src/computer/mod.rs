//! Client side of the computer-use model: the action vocabulary it emits and
//! the request/reply envelopes of the Responses API.

pub mod action;
pub mod client;
pub mod responses;

pub use action::ComputerAction;
pub use client::{ComputerUseProvider, MockComputerUse, OpenAiComputerUse};
pub use responses::{
    ComputerCall, ComputerTool, OutputItem, ResponsesReply, ResponsesRequest, SafetyCheck,
};
