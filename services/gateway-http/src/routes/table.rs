use super::{clinic_routes, placeholder, PathParams, RouteMethod, RouteSpec, RouteTableError};
use http::Method;
use std::collections::HashSet;
use std::path::Path;
use tracing::info;

/// Result of looking up an inbound method and path.
#[derive(Debug)]
pub enum RouteLookup<'a> {
    Matched {
        route: &'a RouteSpec,
        params: PathParams,
    },
    /// The path is known but not for this method.
    MethodNotAllowed,
    NotFound,
}

/// Immutable, validated set of forwarding rules.
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<RouteSpec>,
}

impl RouteTable {
    pub fn new(routes: Vec<RouteSpec>) -> Result<Self, RouteTableError> {
        if routes.is_empty() {
            return Err(RouteTableError::Empty);
        }

        let mut identities = HashSet::new();
        for route in &routes {
            validate_route(route)?;

            if !identities.insert((route.method, shape(&route.path))) {
                return Err(RouteTableError::DuplicateRoute {
                    method: route.method,
                    path: route.path.clone(),
                });
            }
        }

        Ok(Self { routes })
    }

    /// The built-in clinic route table.
    pub fn clinic() -> Result<Self, RouteTableError> {
        Self::new(clinic_routes())
    }

    /// Load a table from a JSON array of route specs.
    pub fn from_file(path: &Path) -> Result<Self, RouteTableError> {
        let contents = std::fs::read_to_string(path)?;
        let routes: Vec<RouteSpec> = serde_json::from_str(&contents)?;
        let table = Self::new(routes)?;
        info!(path = %path.display(), routes = table.len(), "Route table loaded from file");
        Ok(table)
    }

    pub fn routes(&self) -> &[RouteSpec] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Find a route by its declared identity.
    pub fn get(&self, method: RouteMethod, path: &str) -> Option<&RouteSpec> {
        self.routes
            .iter()
            .find(|route| route.method == method && route.path == path)
    }

    /// Match an inbound request. When several patterns match, the one with
    /// the most literal segments wins, so `/api/appointments/range` beats
    /// `/api/appointments/{id}`. A match that only fits because a placeholder
    /// captured an empty segment does not make the path known, so
    /// `GET /api/rooms/` is a 404 rather than a 405.
    pub fn lookup(&self, method: &Method, path: &str) -> RouteLookup<'_> {
        let route_method = RouteMethod::from_method(method);
        let mut path_known = false;
        let mut best: Option<(&RouteSpec, PathParams, usize)> = None;

        for route in &self.routes {
            let Some((params, literals)) = match_path(&route.path, path) else {
                continue;
            };
            if !params.values().any(String::is_empty) {
                path_known = true;
            }

            if Some(route.method) != route_method {
                continue;
            }

            let better = best
                .as_ref()
                .map_or(true, |(_, _, best_literals)| literals > *best_literals);
            if better {
                best = Some((route, params, literals));
            }
        }

        match best {
            Some((route, params, _)) => RouteLookup::Matched { route, params },
            None if path_known => RouteLookup::MethodNotAllowed,
            None => RouteLookup::NotFound,
        }
    }
}

/// Match `path` against `pattern` segment by segment. Placeholders capture
/// the raw segment, which may be empty (`/api/rooms/`). Returns the captured
/// parameters and the number of literal segments matched.
fn match_path(pattern: &str, path: &str) -> Option<(PathParams, usize)> {
    let pattern_segments: Vec<&str> = pattern.split('/').collect();
    let path_segments: Vec<&str> = path.split('/').collect();

    if pattern_segments.len() != path_segments.len() {
        return None;
    }

    let mut params = PathParams::new();
    let mut literals = 0;

    for (expected, actual) in pattern_segments.iter().zip(path_segments.iter()) {
        match placeholder(expected) {
            Some(name) => {
                params.insert(name.to_string(), actual.to_string());
            }
            None if expected == actual => literals += 1,
            None => return None,
        }
    }

    Some((params, literals))
}

/// Pattern with placeholder names erased; two routes with the same method
/// and shape would be ambiguous.
fn shape(pattern: &str) -> String {
    pattern
        .split('/')
        .map(|segment| if placeholder(segment).is_some() { "{}" } else { segment })
        .collect::<Vec<_>>()
        .join("/")
}

fn validate_route(route: &RouteSpec) -> Result<(), RouteTableError> {
    for path in [&route.path, &route.backend_path] {
        if !path.starts_with('/') {
            return Err(RouteTableError::InvalidPath {
                route: route.name.clone(),
                path: path.clone(),
            });
        }

        for segment in path.split('/') {
            let braces = segment.contains(['{', '}']);
            let valid = match placeholder(segment) {
                Some(name) => !name.is_empty() && !name.contains(['{', '}']),
                None => !braces,
            };
            if !valid {
                return Err(RouteTableError::InvalidPlaceholder {
                    route: route.name.clone(),
                    segment: segment.to_string(),
                });
            }
        }
    }

    let captured = route.path_params();
    let mut seen = HashSet::new();
    for name in &captured {
        if !seen.insert(*name) {
            return Err(RouteTableError::DuplicatePlaceholder {
                route: route.name.clone(),
                name: name.to_string(),
            });
        }
    }

    for name in route.template_params() {
        if !captured.contains(&name) {
            return Err(RouteTableError::UnknownPlaceholder {
                route: route.name.clone(),
                name: name.to_string(),
            });
        }
    }

    if route.required_query.iter().any(|key| key.trim().is_empty()) {
        return Err(RouteTableError::EmptyQueryKey {
            route: route.name.clone(),
        });
    }

    Ok(())
}
