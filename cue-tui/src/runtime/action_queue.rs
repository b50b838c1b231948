use propresenter::domain::TimerOperation;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

#[derive(Debug, Clone)]
pub(super) enum Action {
    /// Full reconciliation: fetch remote state and re-derive the clock mode.
    Sync,
    Operation { uuid: String, op: TimerOperation },
    Bulk { op: TimerOperation },
    SubmitForm,
    ConfirmDelete,
}

pub(super) type ActionTx = UnboundedSender<Action>;
pub(super) type ActionRx = UnboundedReceiver<Action>;

pub(super) fn channel() -> (ActionTx, ActionRx) {
    mpsc::unbounded_channel()
}
