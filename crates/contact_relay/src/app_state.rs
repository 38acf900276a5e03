use crate::inbox::Inbox;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) inbox: Inbox,
}
