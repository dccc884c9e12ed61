use std::str::FromStr;

use glam::{Mat4, Quat, Vec3};

use super::geometry::Shape;
use crate::paint::Color;

/// Name of the lit, textured pipeline.
pub const SHADED_PIPELINE: &str = "shaded";
/// Name of the flat-colored light indicator pipeline.
pub const LIGHT_PIPELINE: &str = "light";

/// How an object's model matrix evolves over time.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum TransformRule {
    /// Rotation about `axis` at a constant rate, applied before scale and translation.
    Spin {
        translation: Vec3,
        scale: f32,
        axis: Vec3,
        degrees_per_second: f32,
    },
    Fixed { translation: Vec3, scale: f32 },
}

impl TransformRule {
    /// Model matrix at `elapsed` seconds: `T * S * R`.
    pub fn model(&self, elapsed: f32) -> Mat4 {
        match *self {
            TransformRule::Spin {
                translation,
                scale,
                axis,
                degrees_per_second,
            } => {
                let angle = (degrees_per_second * elapsed).to_radians();
                let axis = axis.try_normalize().unwrap_or(Vec3::Y);
                let rotation = Quat::from_axis_angle(axis, angle);
                Mat4::from_translation(translation)
                    * Mat4::from_scale(Vec3::splat(scale))
                    * Mat4::from_quat(rotation)
            }
            TransformRule::Fixed { translation, scale } => {
                Mat4::from_translation(translation) * Mat4::from_scale(Vec3::splat(scale))
            }
        }
    }

    pub fn translation(&self) -> Vec3 {
        match *self {
            TransformRule::Spin { translation, .. } | TransformRule::Fixed { translation, .. } => {
                translation
            }
        }
    }
}

/// One drawable entry: which mesh, drawn with which pipeline, moved how.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    pub name: &'static str,
    pub mesh: Shape,
    pub pipeline: &'static str,
    pub transform: TransformRule,
}

/// Primary object shown next to the light indicator.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum SceneVariant {
    #[default]
    Sphere,
    Cube,
    Square,
    Triangle,
}

impl FromStr for SceneVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sphere" => Ok(SceneVariant::Sphere),
            "cube" => Ok(SceneVariant::Cube),
            "square" => Ok(SceneVariant::Square),
            "triangle" => Ok(SceneVariant::Triangle),
            other => Err(format!("unknown scene `{other}`")),
        }
    }
}

/// The fixed scene: one primary object followed by the light indicator.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub objects: Vec<SceneObject>,
    pub light_position: Vec3,
    pub light_color: Color,
}

impl Scene {
    pub const LIGHT_POSITION: Vec3 = Vec3::new(-2.0, 0.5, -1.75);

    pub fn new(variant: SceneVariant, sphere_subdivisions: u32) -> Self {
        let mesh = match variant {
            SceneVariant::Sphere => Shape::Sphere {
                lat: sphere_subdivisions,
                lon: sphere_subdivisions,
            },
            SceneVariant::Cube => Shape::Cube,
            SceneVariant::Square => Shape::Square,
            SceneVariant::Triangle => Shape::Triangle,
        };

        let primary = SceneObject {
            name: "primary",
            mesh,
            pipeline: SHADED_PIPELINE,
            transform: TransformRule::Spin {
                translation: Vec3::new(0.0, 0.0, -1.5),
                scale: 0.5,
                axis: Vec3::Y,
                degrees_per_second: 22.5,
            },
        };
        let light = SceneObject {
            name: "light",
            mesh: Shape::Cube,
            pipeline: LIGHT_PIPELINE,
            transform: TransformRule::Fixed {
                translation: Self::LIGHT_POSITION,
                scale: 0.25,
            },
        };

        Self {
            objects: vec![primary, light],
            light_position: Self::LIGHT_POSITION,
            light_color: Color::WHITE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── transform rules ───────────────────────────────────────────────────

    #[test]
    fn spin_at_zero_is_translate_scale() {
        let rule = Scene::new(SceneVariant::Sphere, 34).objects[0].transform;
        let m = rule.model(0.0);
        let expected =
            Mat4::from_translation(Vec3::new(0.0, 0.0, -1.5)) * Mat4::from_scale(Vec3::splat(0.5));
        assert!(m.abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn spin_rotates_about_y_at_configured_rate() {
        let rule = TransformRule::Spin {
            translation: Vec3::ZERO,
            scale: 1.0,
            axis: Vec3::Y,
            degrees_per_second: 22.5,
        };
        // 4 s at 22.5 deg/s is a quarter turn: +X goes to -Z.
        let p = rule.model(4.0).transform_point3(Vec3::X);
        assert!(p.abs_diff_eq(Vec3::NEG_Z, 1e-5));
    }

    #[test]
    fn fixed_rule_ignores_time() {
        let rule = TransformRule::Fixed {
            translation: Scene::LIGHT_POSITION,
            scale: 0.25,
        };
        assert_eq!(rule.model(0.0), rule.model(123.0));
        assert_eq!(rule.translation(), Scene::LIGHT_POSITION);
    }

    // ── scene ─────────────────────────────────────────────────────────────

    #[test]
    fn default_scene_is_sphere_then_light() {
        let scene = Scene::new(SceneVariant::default(), 34);
        let names: Vec<_> = scene.objects.iter().map(|o| o.pipeline).collect();
        assert_eq!(names, [SHADED_PIPELINE, LIGHT_PIPELINE]);
        assert_eq!(scene.objects[0].mesh, Shape::Sphere { lat: 34, lon: 34 });
        assert_eq!(scene.objects[1].mesh, Shape::Cube);
    }

    #[test]
    fn variants_replace_only_the_primary_object() {
        let scene = Scene::new(SceneVariant::Triangle, 34);
        assert_eq!(scene.objects[0].mesh, Shape::Triangle);
        assert_eq!(scene.objects[1].transform.translation(), Scene::LIGHT_POSITION);
    }

    #[test]
    fn variant_parsing() {
        assert_eq!("Cube".parse::<SceneVariant>(), Ok(SceneVariant::Cube));
        assert_eq!(" square ".parse::<SceneVariant>(), Ok(SceneVariant::Square));
        assert!("teapot".parse::<SceneVariant>().is_err());
    }
}
