//! CSV export of locations and routes.

use std::io::{self, Write};

use crate::geometry::Location;

/// Writes `City,X,Y,Z` rows, one per location.
pub fn write_locations_csv<W: Write>(mut w: W, locations: &[Location]) -> io::Result<()> {
    writeln!(w, "City,X,Y,Z")?;
    for loc in locations {
        let [x, y, z] = loc.coords;
        writeln!(w, "{},{x},{y},{z}", loc.id)?;
    }
    w.flush()
}

/// Writes `Order,CityID,X,Y,Z` rows in route order, followed by a closing
/// row that returns to the first city.
///
/// # Errors
/// `InvalidInput` if the route names a location that does not exist.
pub fn write_route_csv<W: Write>(
    mut w: W,
    route: &[usize],
    locations: &[Location],
) -> io::Result<()> {
    writeln!(w, "Order,CityID,X,Y,Z")?;
    for (pos, &id) in closed(route).enumerate() {
        let [x, y, z] = lookup(locations, id)?.coords;
        writeln!(w, "{pos},{id},{x},{y},{z}")?;
    }
    w.flush()
}

/// Writes bare `X,Y,Z` rows in route order with a closing row.
pub fn write_route_xyz<W: Write>(
    mut w: W,
    route: &[usize],
    locations: &[Location],
) -> io::Result<()> {
    for &id in closed(route) {
        let [x, y, z] = lookup(locations, id)?.coords;
        writeln!(w, "{x},{y},{z}")?;
    }
    w.flush()
}

fn closed(route: &[usize]) -> impl Iterator<Item = &usize> {
    route.iter().chain(route.first())
}

fn lookup(locations: &[Location], id: usize) -> io::Result<&Location> {
    locations.get(id).ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("route references unknown location {id}"),
        )
    })
}
