//! Search drawer: debounced incremental search with stale-response discard

pub mod coordinator;
pub mod debounce;
pub mod drawer;
pub mod state;

pub use coordinator::SearchCoordinator;
pub use drawer::{DrawerHandle, SearchDrawer};
pub use state::{SearchRequestState, SearchSnapshot};
