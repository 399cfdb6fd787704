pub mod geometry;
pub mod primitives;
pub mod scale;
pub mod trend;
pub mod types;

pub use geometry::ChartGeometry;
pub use scale::{LinearScale, PriceScale, nearest_index_at, nearest_sample_at, price_extent};
pub use trend::{Trend, compute_trend, reference_point};
pub use types::{PriceHistory, PricePoint, Viewport};
