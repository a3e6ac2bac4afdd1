// Entity Models
//
// Two aggregates, both persisted as whole collections:
// - Chart: one collection for every chart
// - Account: one collection per chart

pub mod account;
pub mod chart;
pub mod tags;

pub use account::Account;
pub use chart::Chart;
pub use tags::Tags;
