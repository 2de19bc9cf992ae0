//! SQLite storage implementation for divisions, cost codes and GL accounts.

mod model;
mod repository;

pub use model::{
    CostCodeConfigurationChangesetDB, CostCodeConfigurationDB, DivisionChangesetDB, DivisionDB,
    GlAccountDB, NewCostCodeConfigurationDB, NewDivisionDB, NewGlAccountDB,
};
pub use repository::CostCodeRepository;
