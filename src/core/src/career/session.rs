/// The one interaction a user's conversation is currently blocked on. The
/// chat layer looks this up before interpreting a message, instead of keeping
/// ad-hoc per-user flags in global state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingAction {
    /// The user's own fixture falls on the current day; the day cannot
    /// advance until it is settled, by confirmation or by a typed-in result.
    ConfirmSimulateOwnFixture { fixture_id: u32 },

    /// The user chose to enter their own result and owes us a scoreline.
    AwaitingOwnResult { fixture_id: u32 },

    /// An AI club's bid for one of the user's players awaits accept/reject.
    RespondToOffer { offer_id: u32 },
}

pub trait SessionStore {
    fn pending(&self, user_id: u64) -> Option<PendingAction>;
    fn set_pending(&mut self, user_id: u64, action: Option<PendingAction>);
}
