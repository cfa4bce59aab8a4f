mod clinic;
mod error;
mod spec;
mod table;

pub use clinic::clinic_routes;
pub use error::RouteTableError;
pub use spec::{placeholder, PathParams, RouteMethod, RouteSpec};
pub use table::{RouteLookup, RouteTable};
