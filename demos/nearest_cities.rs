//! Find the cities closest to a location, then update the index as cities come and go.
//!
//! Run with `cargo run --example nearest_cities`.

use kd_index::kdtree::KdTree;
use kd_index::metric::Euclidean;
use kd_index::neighbors::sort_by_distance;
use kd_index::{Coordinates, KdIndex};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Latitude,
    Longitude,
}

#[derive(Debug, Clone)]
struct City {
    name: &'static str,
    latitude: f64,
    longitude: f64,
}

impl City {
    fn new(name: &'static str, latitude: f64, longitude: f64) -> Self {
        Self {
            name,
            latitude,
            longitude,
        }
    }
}

impl Coordinates for City {
    type Key = Axis;
    type Num = f64;

    fn coord(&self, key: &Axis) -> f64 {
        match key {
            Axis::Latitude => self.latitude,
            Axis::Longitude => self.longitude,
        }
    }
}

fn main() -> kd_index::Result<()> {
    let cities = vec![
        City::new("Berlin", 52.52, 13.40),
        City::new("Hamburg", 53.55, 9.99),
        City::new("Munich", 48.14, 11.58),
        City::new("Vienna", 48.21, 16.37),
        City::new("Prague", 50.08, 14.44),
        City::new("Warsaw", 52.23, 21.01),
        City::new("Copenhagen", 55.68, 12.57),
        City::new("Amsterdam", 52.37, 4.90),
        City::new("Zurich", 47.37, 8.54),
        City::new("Paris", 48.86, 2.35),
    ];
    let mut tree = KdTree::new(cities, Euclidean, vec![Axis::Latitude, Axis::Longitude])?;
    println!(
        "{} cities, balance factor {:.2}",
        tree.len(),
        tree.balance_factor()
    );

    let leipzig = City::new("Leipzig", 51.34, 12.37);
    let mut result = tree.nearest(&leipzig, 3, None);
    sort_by_distance(&mut result);
    println!("closest to {}:", leipzig.name);
    for neighbor in &result {
        println!("  {} ({:.2})", neighbor.point.name, neighbor.distance);
    }

    let within = tree.nearest(&leipzig, 10, Some(3.0));
    println!("{} cities within 3 degrees", within.len());

    let id = tree.insert(City::new("Dresden", 51.05, 13.74))?;
    let closest = tree.nearest(&leipzig, 1, None);
    println!("after insert, closest is {}", closest[0].point.name);

    if let Some(removed) = tree.remove(id, &City::new("Dresden", 51.05, 13.74)) {
        println!("removed {}", removed.name);
    }
    println!("{} cities", tree.len());

    Ok(())
}
