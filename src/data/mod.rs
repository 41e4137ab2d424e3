/// Data layer: core types, loading, grid assembly and export.
///
/// Architecture:
/// ```text
///  positions.txt            (x, y).txt  ...
///        │                       │
///        ▼                       ▼
///   ┌──────────┐           ┌──────────┐
///   │   grid    │           │  loader   │  skip header, flatten,
///   └──────────┘           └──────────┘  filter sentinels
///        │                       │
///        ▼                       ▼
///   ScanLayout              HeightSamples ──► analysis
///   (positions +                 │
///    UniformityGrid)             ▼
///        │                   step height
///        └──────────┬────────────┘
///                   ▼
///              ┌──────────┐
///              │  export   │  tab-separated matrix
///              └──────────┘
/// ```

pub mod export;
pub mod filter;
pub mod grid;
pub mod loader;
pub mod model;
