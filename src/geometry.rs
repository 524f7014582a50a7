use glam::Vec3;

/// GPU ready mesh data.
///
/// Vertices are laid out as `position.xyz` followed by `normal.xyz`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Mesh {
    pub vertices: Vec<f32>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 6
    }

    pub fn position(&self, index: usize) -> Vec3 {
        Vec3::from_slice(&self.vertices[index * 6..index * 6 + 3])
    }

    pub fn normal(&self, index: usize) -> Vec3 {
        Vec3::from_slice(&self.vertices[index * 6 + 3..index * 6 + 6])
    }

    fn push_vertex(&mut self, position: Vec3, normal: Vec3) -> u32 {
        let index = self.vertex_count() as u32;
        self.vertices.extend_from_slice(&position.to_array());
        self.vertices.extend_from_slice(&normal.to_array());
        index
    }

    /// Adds a flat-shaded convex polygon. Corners must be ordered around the
    /// polygon; the winding is flipped when needed so the face points along
    /// `outward`.
    fn push_polygon(&mut self, corners: &[Vec3], outward: Vec3) {
        if corners.len() < 3 {
            return;
        }
        let mut normal = (corners[1] - corners[0])
            .cross(corners[2] - corners[0])
            .normalize_or_zero();
        let flip = normal.dot(outward) < 0.0;
        if flip {
            normal = -normal;
        }
        let first = self.vertex_count() as u32;
        for &corner in corners {
            self.push_vertex(corner, normal);
        }
        for i in 1..(corners.len() as u32 - 1) {
            if flip {
                self.indices.extend_from_slice(&[first, first + i + 1, first + i]);
            } else {
                self.indices.extend_from_slice(&[first, first + i, first + i + 1]);
            }
        }
    }
}

/// Regular dodecahedron centred on the origin with its vertices on a sphere
/// of the given radius.
pub fn dodecahedron(radius: f32) -> Mesh {
    let phi = (1.0 + 5.0_f32.sqrt()) / 2.0;
    let inv = 1.0 / phi;

    let mut corners = Vec::with_capacity(20);
    for x in [-1.0, 1.0] {
        for y in [-1.0, 1.0] {
            for z in [-1.0, 1.0] {
                corners.push(Vec3::new(x, y, z));
            }
        }
    }
    for a in [-1.0, 1.0] {
        for b in [-1.0, 1.0] {
            corners.push(Vec3::new(0.0, a * inv, b * phi));
            corners.push(Vec3::new(a * inv, b * phi, 0.0));
            corners.push(Vec3::new(a * phi, 0.0, b * inv));
        }
    }
    let scale = radius / 3.0_f32.sqrt();
    for corner in &mut corners {
        *corner *= scale;
    }

    // Face centres of a dodecahedron point at the vertices of its dual
    // icosahedron.
    let mut face_directions = Vec::with_capacity(12);
    for a in [-1.0, 1.0] {
        for b in [-1.0, 1.0] {
            face_directions.push(Vec3::new(0.0, a * phi, b).normalize());
            face_directions.push(Vec3::new(a * phi, b, 0.0).normalize());
            face_directions.push(Vec3::new(a, 0.0, b * phi).normalize());
        }
    }

    let mut mesh = Mesh::default();
    for direction in face_directions {
        let mut ranked: Vec<Vec3> = corners.clone();
        ranked.sort_by(|a, b| b.dot(direction).total_cmp(&a.dot(direction)));
        ranked.truncate(5);
        let face = order_around(&ranked, direction);
        mesh.push_polygon(&face, direction);
    }
    mesh
}

/// Cone with its apex up, centred on the origin, using flat side facets.
pub fn cone(radius: f32, height: f32, segments: u32) -> Mesh {
    let segments = segments.max(3);
    let apex = Vec3::new(0.0, height / 2.0, 0.0);
    let base_y = -height / 2.0;
    let rim: Vec<Vec3> = (0..segments)
        .map(|i| {
            let theta = i as f32 / segments as f32 * std::f32::consts::TAU;
            Vec3::new(radius * theta.sin(), base_y, radius * theta.cos())
        })
        .collect();

    let mut mesh = Mesh::default();
    for i in 0..rim.len() {
        let a = rim[i];
        let b = rim[(i + 1) % rim.len()];
        let outward = Vec3::new(a.x + b.x, 0.0, a.z + b.z);
        mesh.push_polygon(&[apex, a, b], outward);
    }
    mesh.push_polygon(&rim, Vec3::NEG_Y);
    mesh
}

fn order_around(points: &[Vec3], axis: Vec3) -> Vec<Vec3> {
    let centre = points.iter().copied().sum::<Vec3>() / points.len() as f32;
    let u = axis.any_orthonormal_vector();
    let v = axis.cross(u);
    let mut ordered = points.to_vec();
    ordered.sort_by(|a, b| {
        let angle = |p: &Vec3| {
            let d = *p - centre;
            d.dot(v).atan2(d.dot(u))
        };
        angle(a).total_cmp(&angle(b))
    });
    ordered
}
