mod dashmap_upstream;
mod http_upstream;
mod mock_upstreams;

pub use dashmap_upstream::DashMapUpstream;
pub use http_upstream::{HttpUpstream, HttpUpstreamConfig};
pub use mock_upstreams::{
    MockCrmUpstream, MockFunnelUpstream, MockInventoryUpstream, MockLogisticsUpstream, MockPricingUpstream,
    MockProductUpstream,
};
