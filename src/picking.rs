use glam::{Mat4, Vec2, Vec3};

/// World-space ray cast from the camera through a point on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Unprojects a point given in normalized device coordinates through the
    /// inverse of an OpenGL-style (`z` in `[-1, 1]`) view-projection matrix.
    pub fn from_ndc(ndc: Vec2, view_proj: Mat4) -> Option<Self> {
        let inverse = view_proj.inverse();
        let near = inverse.project_point3(ndc.extend(-1.0));
        let far = inverse.project_point3(ndc.extend(1.0));
        let direction = (far - near).try_normalize()?;
        Some(Self {
            origin: near,
            direction,
        })
    }

    /// Distance along the ray to the first intersection with a sphere.
    pub fn intersect_sphere(&self, centre: Vec3, radius: f32) -> Option<f32> {
        let offset = self.origin - centre;
        let b = offset.dot(self.direction);
        let c = offset.length_squared() - radius * radius;
        let discriminant = b * b - c;
        if discriminant < 0.0 {
            return None;
        }
        let root = discriminant.sqrt();
        let near = -b - root;
        let far = -b + root;
        if near >= 0.0 {
            Some(near)
        } else if far >= 0.0 {
            Some(0.0)
        } else {
            None
        }
    }
}

/// Pickable bounding sphere.
#[derive(Debug, Clone, PartialEq)]
pub struct HitSphere<T> {
    pub id: T,
    pub centre: Vec3,
    pub radius: f32,
}

/// Returns the id of the closest sphere hit by `ray`.
pub fn pick_nearest<T, I>(ray: &Ray, spheres: I) -> Option<T>
where
    I: IntoIterator<Item = HitSphere<T>>,
{
    spheres
        .into_iter()
        .filter_map(|sphere| {
            ray.intersect_sphere(sphere.centre, sphere.radius)
                .map(|distance| (distance, sphere.id))
        })
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, id)| id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> Mat4 {
        let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO, Vec3::Y);
        let projection = Mat4::perspective_rh_gl(60f32.to_radians(), 1.0, 0.1, 100.0);
        projection * view
    }

    #[test]
    fn centre_ray_points_down_the_view_axis() {
        let ray = Ray::from_ndc(Vec2::ZERO, camera()).unwrap();
        assert!((ray.direction - Vec3::NEG_Z).length() < 1e-4);
        assert!(ray.origin.x.abs() < 1e-4 && ray.origin.y.abs() < 1e-4);
    }

    #[test]
    fn sphere_intersection_distance() {
        let ray = Ray {
            origin: Vec3::new(0.0, 0.0, 10.0),
            direction: Vec3::NEG_Z,
        };
        let distance = ray.intersect_sphere(Vec3::ZERO, 1.0).unwrap();
        assert!((distance - 9.0).abs() < 1e-5);
        assert_eq!(ray.intersect_sphere(Vec3::new(5.0, 0.0, 0.0), 1.0), None);
        assert_eq!(ray.intersect_sphere(Vec3::new(0.0, 0.0, 20.0), 1.0), None);
    }

    #[test]
    fn picks_closest_sphere() {
        let ray = Ray::from_ndc(Vec2::ZERO, camera()).unwrap();
        let hit = pick_nearest(
            &ray,
            [
                HitSphere {
                    id: "far",
                    centre: Vec3::new(0.0, 0.0, -5.0),
                    radius: 1.0,
                },
                HitSphere {
                    id: "near",
                    centre: Vec3::new(0.0, 0.0, 2.0),
                    radius: 1.0,
                },
                HitSphere {
                    id: "off-axis",
                    centre: Vec3::new(4.0, 0.0, 5.0),
                    radius: 1.0,
                },
            ],
        );
        assert_eq!(hit, Some("near"));
    }
}
