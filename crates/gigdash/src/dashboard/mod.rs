//! Dashboard reads: snapshot assemblers and the caching facade in front of
//! them.

mod assembler;
mod facade;

#[cfg(test)]
pub(crate) mod test_support;

pub use assembler::{
    PipelineAssembler, SnapshotAssembler, UserDashboardAssembler, MAX_FETCH_STAGES,
};
pub use facade::{DashboardFacade, DashboardOptions};
