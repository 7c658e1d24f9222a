//! Data layer: claims table, conversion, filtering and aggregation.
//!
//! Architecture:
//! ```text
//!  .xlsx / .csv / .parquet          data/claims.json (embedded)
//!        │                                   │
//!        ▼                                   ▼
//!   ┌──────────┐   artifact   ┌─────────────────────┐
//!   │  loader   │ ───────────▶ │ ColumnTable          │ column → cells
//!   └──────────┘              └─────────────────────┘
//!                                        │
//!                                        ▼
//!                               ┌──────────────┐
//!                               │   filter      │ rename + validity → Vec<Record>
//!                               └──────────────┘
//!                                        │
//!                    ┌───────────────────┼───────────────────┐
//!                    ▼                   ▼                   ▼
//!             provider totals    partner × code means   partner summary
//!                    │                   │                   │
//!                    ▼                   ▼                   ▼
//!              rank (top 10)     rank (top N codes)        moic
//!                    └───────────────────┴───────────────────┘
//!                                        │
//!                                        ▼
//!                                  DashboardView
//! ```

pub mod aggregate;
pub mod filter;
pub mod loader;
pub mod model;
pub mod moic;
pub mod rank;
pub mod view;
