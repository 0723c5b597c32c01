//! Template catalog - parsing and storage of authored rotation templates

use bevy::prelude::*;
use std::fs;

use crate::constants::*;
use crate::rotation::{ArrowType, Formation, ROTATIONS, SegmentType, Situation, seat_at};
use crate::templates::types::{PositionTemplate, SeatFields};

/// Immutable set of authored templates, built once per process
#[derive(Resource, Debug, Clone, Default)]
pub struct TemplateCatalog {
    templates: Vec<PositionTemplate>,
}

impl TemplateCatalog {
    /// Load templates from file, or return the built-in catalog if the file can't be read
    pub fn load_from_file(path: &str) -> Self {
        match fs::read_to_string(path) {
            Ok(content) => Self::parse(&content),
            Err(e) => {
                warn!("Could not read templates file {}: {}, using defaults", path, e);
                Self::default_catalog()
            }
        }
    }

    /// Load into `slot` unless a catalog is already there
    pub fn ensure_loaded<'a>(slot: &'a mut Option<TemplateCatalog>, path: &str) -> &'a TemplateCatalog {
        slot.get_or_insert_with(|| Self::load_from_file(path))
    }

    /// Parse template file content
    pub fn parse(content: &str) -> Self {
        let mut catalog = Self::default();
        let mut current: Option<TemplateBuilder> = None;

        for (line_no, line) in content.lines().enumerate() {
            let line = line.trim();

            // Skip empty lines and comments
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some(header) = line.strip_prefix("template:") {
                if let Some(builder) = current.take() {
                    catalog.push_built(builder);
                }
                current = TemplateBuilder::from_header(header);
                if current.is_none() {
                    warn!("Bad template header on line {}: '{}'", line_no + 1, header.trim());
                }
                continue;
            }

            let Some(builder) = current.as_mut() else {
                continue;
            };

            let Some((field, values)) = line.split_once(':') else {
                warn!("Ignoring line {} in templates: '{}'", line_no + 1, line);
                continue;
            };
            if !builder.set_field(field.trim(), values) {
                warn!(
                    "Template {} has a bad '{}' line (line {}), skipping template",
                    builder.label(),
                    field.trim(),
                    line_no + 1
                );
                builder.broken = true;
            }
        }

        if let Some(builder) = current.take() {
            catalog.push_built(builder);
        }

        info!("Loaded {} rotation templates", catalog.templates.len());
        catalog
    }

    fn push_built(&mut self, builder: TemplateBuilder) {
        if let Some(template) = builder.build() {
            self.insert(template);
        }
    }

    /// Add a template; a template with the same key is replaced (last loaded wins)
    pub fn insert(&mut self, template: PositionTemplate) {
        if let Some(existing) = self.templates.iter_mut().find(|t| t.key() == template.key()) {
            warn!("Duplicate template {}, last loaded wins", template);
            *existing = template;
        } else {
            self.templates.push(template);
        }
    }

    /// Template for one (formation, situation, rotation)
    pub fn get(
        &self,
        formation: Formation,
        situation: Situation,
        rotation_number: u8,
    ) -> Option<&PositionTemplate> {
        self.templates
            .iter()
            .find(|t| t.key() == (formation, situation, rotation_number))
    }

    /// All templates authored for a formation, in load order
    pub fn for_formation(&self, formation: Formation) -> impl Iterator<Item = &PositionTemplate> {
        self.templates.iter().filter(move |t| t.formation == formation)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Built-in catalog: every situation and rotation of the 6-2
    pub fn default_catalog() -> Self {
        let mut catalog = Self::default();
        for situation in Situation::ALL {
            for rotation in ROTATIONS {
                catalog.templates.push(default_template(Formation::SixTwo, situation, rotation));
            }
        }
        catalog
    }
}

/// Court spots (x, z) for zones 1..6 in each situation
fn situation_spots(situation: Situation) -> [(f32, f32); SEAT_COUNT] {
    match situation {
        Situation::Rotation => [
            (COURT_RIGHT_X, BACK_ROW_Z),
            (COURT_RIGHT_X, FRONT_ROW_Z),
            (COURT_MIDDLE_X, FRONT_ROW_Z),
            (COURT_LEFT_X, FRONT_ROW_Z),
            (COURT_LEFT_X, BACK_ROW_Z),
            (COURT_MIDDLE_X, BACK_ROW_Z),
        ],
        Situation::ServeStack => [
            (COURT_RIGHT_X + 0.5, END_LINE_Z - 0.5), // Server behind the end line
            (COURT_RIGHT_X, FRONT_ROW_Z + 0.5),
            (COURT_MIDDLE_X, FRONT_ROW_Z + 0.5),
            (COURT_LEFT_X, FRONT_ROW_Z + 0.5),
            (COURT_LEFT_X, BACK_ROW_Z + 1.0),
            (COURT_MIDDLE_X, BACK_ROW_Z + 0.5),
        ],
        Situation::ServeReceiveStack => [
            (COURT_RIGHT_X - 0.5, BACK_ROW_Z + 0.5),
            (COURT_RIGHT_X + 0.5, FRONT_ROW_Z - 1.5),
            (COURT_MIDDLE_X + 0.5, FRONT_ROW_Z + 1.0),
            (COURT_LEFT_X - 0.5, FRONT_ROW_Z - 1.5),
            (COURT_LEFT_X + 0.5, BACK_ROW_Z + 0.5),
            (COURT_MIDDLE_X, BACK_ROW_Z),
        ],
        Situation::ReadyToAttack => [
            (COURT_RIGHT_X, BACK_ROW_Z + 1.0),
            (COURT_RIGHT_X + 0.5, FRONT_ROW_Z - 1.0),
            (COURT_MIDDLE_X, FRONT_ROW_Z - 1.0),
            (COURT_LEFT_X - 0.5, FRONT_ROW_Z - 1.0),
            (COURT_LEFT_X, BACK_ROW_Z + 1.0),
            (COURT_MIDDLE_X, BACK_ROW_Z + 1.5),
        ],
        Situation::BaseDefense => [
            (COURT_RIGHT_X, BACK_ROW_Z - 0.5),
            (COURT_RIGHT_X, FRONT_ROW_Z + 1.0),
            (COURT_MIDDLE_X, FRONT_ROW_Z + 1.0),
            (COURT_LEFT_X, FRONT_ROW_Z + 1.0),
            (COURT_LEFT_X, BACK_ROW_Z - 0.5),
            (COURT_MIDDLE_X, BACK_ROW_Z - 1.5),
        ],
    }
}

/// Built-in template: seat `i` stands on the spot of the zone it occupies this rotation
pub fn default_template(formation: Formation, situation: Situation, rotation: u8) -> PositionTemplate {
    let spots = situation_spots(situation);
    let positions = (0..SEAT_COUNT)
        .map(|seat| {
            let (x, z) = spots[seat_at(rotation, seat)];
            Vec3::new(x, 0.0, z)
        })
        .collect();

    PositionTemplate {
        formation,
        situation,
        rotation_number: rotation,
        fields: SeatFields {
            positions,
            player_names: DEFAULT_SEAT_NAMES.iter().map(|n| n.to_string()).collect(),
            arrow_types: vec![ArrowType::RedPoint; SEAT_COUNT],
            segment_types: vec![SegmentType::RedRect; SEAT_COUNT],
            arrow_head_colors: vec![DEFAULT_ARROW_HEAD_COLOR; SEAT_COUNT],
            arrow_segment_colors: vec![DEFAULT_ARROW_SEGMENT_COLOR; SEAT_COUNT],
            arrow_heights: vec![DEFAULT_ARROW_HEIGHT; SEAT_COUNT],
            arrow_segment_lengths: vec![DEFAULT_ARROW_SEGMENT_LENGTH; SEAT_COUNT],
        },
    }
}

/// Builder for parsing templates from file
struct TemplateBuilder {
    formation: Formation,
    situation: Situation,
    rotation_number: u8,
    fields: SeatFields,
    broken: bool,
}

impl TemplateBuilder {
    /// Header format: `<formation> <situation> <rotation>`
    fn from_header(header: &str) -> Option<Self> {
        let mut parts = header.split_whitespace();
        let formation = parts.next()?.parse().ok()?;
        let situation = parts.next()?.parse().ok()?;
        let rotation_number: u8 = parts.next()?.parse().ok()?;
        if !ROTATIONS.contains(&rotation_number) || parts.next().is_some() {
            return None;
        }
        Some(Self {
            formation,
            situation,
            rotation_number,
            fields: SeatFields::default(),
            broken: false,
        })
    }

    fn label(&self) -> String {
        format!("{} {} {}", self.formation, self.situation, self.rotation_number)
    }

    /// Parse one `field: a | b | ...` line; false if any entry is malformed
    fn set_field(&mut self, field: &str, values: &str) -> bool {
        let entries: Vec<&str> = values.split('|').map(str::trim).collect();
        let fields = &mut self.fields;
        match field {
            "positions" => parse_all(&entries, parse_vec3).map(|v| fields.positions = v).is_some(),
            // Names may legitimately be blank
            "names" => parse_all(&entries, |s| Some(s.to_string()))
                .map(|v| fields.player_names = v)
                .is_some(),
            "arrows" => parse_all(&entries, |s| s.parse::<ArrowType>().ok())
                .map(|v| fields.arrow_types = v)
                .is_some(),
            "segments" => parse_all(&entries, |s| s.parse::<SegmentType>().ok())
                .map(|v| fields.segment_types = v)
                .is_some(),
            "head_colors" => parse_all(&entries, parse_color)
                .map(|v| fields.arrow_head_colors = v)
                .is_some(),
            "segment_colors" => parse_all(&entries, parse_color)
                .map(|v| fields.arrow_segment_colors = v)
                .is_some(),
            "heights" => parse_all(&entries, |s| s.parse::<f32>().ok())
                .map(|v| fields.arrow_heights = v)
                .is_some(),
            "lengths" => parse_all(&entries, |s| s.parse::<f32>().ok())
                .map(|v| fields.arrow_segment_lengths = v)
                .is_some(),
            _ => false,
        }
    }

    fn build(self) -> Option<PositionTemplate> {
        if self.broken {
            return None;
        }
        Some(PositionTemplate {
            formation: self.formation,
            situation: self.situation,
            rotation_number: self.rotation_number,
            fields: self.fields,
        })
    }
}

/// Parse every entry, or nothing. A blank line body yields an empty list.
fn parse_all<T>(entries: &[&str], parse: impl Fn(&str) -> Option<T>) -> Option<Vec<T>> {
    if entries.len() == 1 && entries[0].is_empty() {
        return Some(Vec::new());
    }
    entries.iter().map(|e| parse(e)).collect()
}

/// Parse "x,y,z"
pub(crate) fn parse_vec3(s: &str) -> Option<Vec3> {
    let parts: Vec<f32> = s
        .split(',')
        .map(|p| p.trim().parse::<f32>())
        .collect::<Result<_, _>>()
        .ok()?;
    match parts.as_slice() {
        [x, y, z] => Some(Vec3::new(*x, *y, *z)),
        _ => None,
    }
}

/// Parse "r,g,b" or "r,g,b,a" (sRGB, 0..1)
pub(crate) fn parse_color(s: &str) -> Option<Color> {
    let parts: Vec<f32> = s
        .split(',')
        .map(|p| p.trim().parse::<f32>())
        .collect::<Result<_, _>>()
        .ok()?;
    match parts.as_slice() {
        [r, g, b] => Some(Color::srgb(*r, *g, *b)),
        [r, g, b, a] => Some(Color::srgba(*r, *g, *b, *a)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::validate_positions;

    const SAMPLE: &str = r#"
# two templates, the second missing most fields
template: F6_2 Rotation 1
positions: 3,0,-7 | 3,0,-2 | 0,0,-2 | -3,0,-2 | -3,0,-7 | 0,0,-7
names: S1 | OH1 | MB1 | | OH2 | MB2
arrows: RedPoint | GreenPoint | BlueZip | None | RedPoint | RedPoint
segments: RedRect | RedRect | GreenTube | GreenTube | BlueZip | RedRect
head_colors: 1,0,0 | 1,0,0 | 1,0,0 | 1,0,0 | 1,0,0 | 1,0,0,0.5
segment_colors: 0,0,1 | 0,0,1 | 0,0,1 | 0,0,1 | 0,0,1 | 0,0,1
heights: 0.5 | 0.5 | 0.5 | 0.5 | 0.5 | 0.75
lengths: 0.1 | 0.1 | 0.1 | 0.1 | 0.1 | 0.1

template: F6_2 ServeStack 3
positions: 3,0,-9 | 3,0,-1 | 0,0,-1 | -3,0,-1 | -3,0,-6 | 0,0,-6
names: S1 | OH1 | MB1 | S2
"#;

    #[test]
    fn test_parse_templates() {
        let catalog = TemplateCatalog::parse(SAMPLE);
        assert_eq!(catalog.len(), 2);

        let t = catalog.get(Formation::SixTwo, Situation::Rotation, 1).unwrap();
        assert_eq!(t.fields.positions[1], Vec3::new(3.0, 0.0, -2.0));
        assert_eq!(t.fields.player_names[3], "");
        assert_eq!(t.fields.arrow_types[3], ArrowType::Hidden);
        assert_eq!(t.fields.arrow_heights[5], 0.75);
        assert_eq!(t.fields.arrow_head_colors[5], Color::srgba(1.0, 0.0, 0.0, 0.5));
    }

    #[test]
    fn test_missing_field_lines_are_empty_lists() {
        let catalog = TemplateCatalog::parse(SAMPLE);
        let t = catalog.get(Formation::SixTwo, Situation::ServeStack, 3).unwrap();
        assert_eq!(t.fields.player_names.len(), 4);
        assert!(t.fields.arrow_types.is_empty());
        assert!(t.fields.arrow_segment_lengths.is_empty());
    }

    #[test]
    fn test_malformed_template_skipped() {
        let content = r#"
template: F6_2 Rotation 2
positions: 3,0 | 3,0,-2
template: F6_2 Rotation 9
positions: 1,1,1
template: F6_2 Rotation 3
heights: 1.0
"#;
        let catalog = TemplateCatalog::parse(content);
        assert_eq!(catalog.len(), 1);
        assert!(catalog.get(Formation::SixTwo, Situation::Rotation, 3).is_some());
    }

    #[test]
    fn test_duplicate_last_loaded_wins() {
        let content = r#"
template: F6_2 BaseDefense 4
heights: 1.0
template: F6_2 BaseDefense 4
heights: 2.0
"#;
        let catalog = TemplateCatalog::parse(content);
        assert_eq!(catalog.len(), 1);
        let t = catalog.get(Formation::SixTwo, Situation::BaseDefense, 4).unwrap();
        assert_eq!(t.fields.arrow_heights, vec![2.0]);
    }

    #[test]
    fn test_default_catalog_complete_and_valid() {
        let catalog = TemplateCatalog::default_catalog();
        assert_eq!(catalog.len(), 30);
        assert_eq!(catalog.for_formation(Formation::FiveOne).count(), 0);

        for t in catalog.for_formation(Formation::SixTwo) {
            assert!(t.fields.lengths().iter().all(|len| *len == SEAT_COUNT));
            let positions: [Vec3; SEAT_COUNT] =
                std::array::from_fn(|i| t.fields.positions[i]);
            assert!(
                validate_positions(t.rotation_number, &positions),
                "default layout invalid for {}",
                t
            );
        }
    }

    #[test]
    fn test_shipped_templates_match_builtin() {
        let shipped = TemplateCatalog::load_from_file(TEMPLATES_FILE);
        assert_eq!(shipped.len(), 30);
        for situation in Situation::ALL {
            for rotation in ROTATIONS {
                assert_eq!(
                    shipped.get(Formation::SixTwo, situation, rotation),
                    Some(&default_template(Formation::SixTwo, situation, rotation)),
                );
            }
        }
    }

    #[test]
    fn test_ensure_loaded_is_idempotent() {
        let mut slot = Some(TemplateCatalog::parse(SAMPLE));
        let catalog = TemplateCatalog::ensure_loaded(&mut slot, "does/not/exist.txt");
        assert_eq!(catalog.len(), 2);

        let mut empty = None;
        let catalog = TemplateCatalog::ensure_loaded(&mut empty, "does/not/exist.txt");
        assert_eq!(catalog.len(), 30);
    }
}
