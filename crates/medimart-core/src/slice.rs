//! # Store Slice Contract
//!
//! Every store in the client is a keyed partition ("slice") of one
//! process-wide state. A slice is a plain value plus a reducer over a closed
//! set of actions.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  UI action ──► Slice::Action ──► Slice::reduce ──► new state            │
//! │                                        │                                │
//! │                                        └──► subscribers re-render       │
//! │                                                                         │
//! │  Cart          CartAction          never fails                          │
//! │  WatchLater    WatchLaterAction    never fails                          │
//! │  OrderHistory  OrderAction         rejects illegal status transitions   │
//! │  AuthSession   AuthAction          never fails (errors stored as data)  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! No slice ever calls another one. Cross-slice work (checkout) lives in the
//! client's command layer.

use std::fmt::Debug;

use crate::error::CoreResult;

/// A state partition with a pure reducer.
pub trait Slice: Clone + Debug + Send + Sync + 'static {
    /// The tagged union of everything that can change this slice.
    type Action: Debug + Send;

    /// Key of this slice in the process-wide state, used in logs.
    const NAME: &'static str;

    /// Applies `action` in place.
    ///
    /// ## Contract
    /// - Runs to completion with no suspension point.
    /// - On `Err`, the state is exactly what it was before the call.
    fn reduce(&mut self, action: Self::Action) -> CoreResult<()>;
}
