// JSON shape for glam vectors in persisted clay data: `{ "x": .., "y": .., "z": .. }`.

use glam::Vec3;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Remote definition so `Vec3` fields can use `#[serde(with = "Vec3Def")]`.
#[derive(Serialize, Deserialize)]
#[serde(remote = "Vec3")]
pub struct Vec3Def {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

#[derive(Serialize, Deserialize)]
struct Point(#[serde(with = "Vec3Def")] Vec3);

/// `Option<Vec<Vec3>>` as an optional array of `{x, y, z}` objects.
pub mod point_list {
    use super::*;

    pub fn serialize<S: Serializer>(points: &Option<Vec<Vec3>>, s: S) -> Result<S::Ok, S::Error> {
        points
            .as_ref()
            .map(|list| list.iter().map(|p| Point(*p)).collect::<Vec<_>>())
            .serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Vec<Vec3>>, D::Error> {
        let points: Option<Vec<Point>> = Option::deserialize(d)?;
        Ok(points.map(|list| list.into_iter().map(|Point(p)| p).collect()))
    }
}
