/// Coarse request status shared by the send and history-load flows. The
/// presentation layer gates its send control on `Loading`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum RequestStatus {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed,
}
