/// Side effects requested by `update` and carried out by the runtime
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cmd {
    /// Re-run the host view; coalesced by the runtime
    RequestRender,

    LogError { message: String },
    LogInfo { message: String },
}
