//! Sensor channel vocabulary and selection-to-column resolution
//!
//! Physical column names are `<unit code>_<axis><sensor suffix>`, e.g.
//! `LA_zgyro`. The naming convention is the only link between a logical
//! selection (unit + sensor category) and a column of the dataset.

use serde::{Deserialize, Serialize};

/// Number of sensor codes recorded per body unit (3 sensors x 3 axes)
pub const CODES_PER_UNIT: usize = 9;

/// Total number of numeric sensor channels in a recording row
pub const CHANNEL_COUNT: usize = 5 * CODES_PER_UNIT;

/// Per-unit sensor codes in declaration order
pub const SENSOR_CODES: [&str; CODES_PER_UNIT] = [
    "xacc", "yacc", "zacc", "xgyro", "ygyro", "zgyro", "xmag", "ymag", "zmag",
];

/// Human-readable labels, parallel to [`SENSOR_CODES`]
pub const SENSOR_LABELS: [&str; CODES_PER_UNIT] = [
    "X Acceleration",
    "Y Acceleration",
    "Z Acceleration",
    "X Angular Velocity",
    "Y Angular Velocity",
    "Z Angular Velocity",
    "X Magnetic Fields",
    "Y Magnetic Fields",
    "Z Magnetic Fields",
];

/// Sensor placement on the body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BodyUnit {
    Torso,
    RightArm,
    LeftArm,
    RightLeg,
    LeftLeg,
}

/// Body side of a bilateral unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

/// Unit picker values surfaced by the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitGroup {
    Torso,
    Arms,
    Legs,
}

/// Sensor category; each has one channel per axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SensorCategory {
    Accelerometer,
    Gyroscope,
    Magnetometer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl BodyUnit {
    /// Units in dataset column order
    pub const ALL: [BodyUnit; 5] = [
        BodyUnit::Torso,
        BodyUnit::RightArm,
        BodyUnit::LeftArm,
        BodyUnit::RightLeg,
        BodyUnit::LeftLeg,
    ];

    /// Column prefix used in the dataset
    pub fn code(self) -> &'static str {
        match self {
            BodyUnit::Torso => "T",
            BodyUnit::RightArm => "RA",
            BodyUnit::LeftArm => "LA",
            BodyUnit::RightLeg => "RL",
            BodyUnit::LeftLeg => "LL",
        }
    }

    pub fn side(self) -> Option<Side> {
        match self {
            BodyUnit::Torso => None,
            BodyUnit::LeftArm | BodyUnit::LeftLeg => Some(Side::Left),
            BodyUnit::RightArm | BodyUnit::RightLeg => Some(Side::Right),
        }
    }

    pub fn group(self) -> UnitGroup {
        match self {
            BodyUnit::Torso => UnitGroup::Torso,
            BodyUnit::LeftArm | BodyUnit::RightArm => UnitGroup::Arms,
            BodyUnit::LeftLeg | BodyUnit::RightLeg => UnitGroup::Legs,
        }
    }

    /// Position of the unit's first column in a recording row
    fn column_offset(self) -> usize {
        let position = match self {
            BodyUnit::Torso => 0,
            BodyUnit::RightArm => 1,
            BodyUnit::LeftArm => 2,
            BodyUnit::RightLeg => 3,
            BodyUnit::LeftLeg => 4,
        };
        position * CODES_PER_UNIT
    }

    /// Title fragment: "Left Arms", "Right Legs", or the plain group name
    pub fn title(self) -> String {
        match self.side() {
            Some(Side::Left) => format!("Left {}", self.group()),
            Some(Side::Right) => format!("Right {}", self.group()),
            None => self.group().to_string(),
        }
    }
}

impl UnitGroup {
    pub const ALL: [UnitGroup; 3] = [UnitGroup::Torso, UnitGroup::Arms, UnitGroup::Legs];

    /// Units rendered for the group, left side first
    pub fn units(self) -> &'static [BodyUnit] {
        match self {
            UnitGroup::Torso => &[BodyUnit::Torso],
            UnitGroup::Arms => &[BodyUnit::LeftArm, BodyUnit::RightArm],
            UnitGroup::Legs => &[BodyUnit::LeftLeg, BodyUnit::RightLeg],
        }
    }
}

impl SensorCategory {
    pub const ALL: [SensorCategory; 3] = [
        SensorCategory::Accelerometer,
        SensorCategory::Gyroscope,
        SensorCategory::Magnetometer,
    ];

    /// Substring identifying the category in [`SENSOR_CODES`]
    pub fn code_suffix(self) -> &'static str {
        match self {
            SensorCategory::Accelerometer => "acc",
            SensorCategory::Gyroscope => "gyro",
            SensorCategory::Magnetometer => "mag",
        }
    }

    /// Substring identifying the category in [`SENSOR_LABELS`]
    pub fn label_fragment(self) -> &'static str {
        match self {
            SensorCategory::Accelerometer => "Acceleration",
            SensorCategory::Gyroscope => "Angular Velocity",
            SensorCategory::Magnetometer => "Magnetic Fields",
        }
    }

    /// Plural name used by the dashboard picker and chart titles
    pub fn display_name(self) -> &'static str {
        match self {
            SensorCategory::Accelerometer => "Accelerometers",
            SensorCategory::Gyroscope => "Gyroscopes",
            SensorCategory::Magnetometer => "Magnetometers",
        }
    }
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub fn letter(self) -> char {
        match self {
            Axis::X => 'x',
            Axis::Y => 'y',
            Axis::Z => 'z',
        }
    }

    fn position(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

/// One physical sensor column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelId {
    pub unit: BodyUnit,
    pub index: usize,
}

impl ChannelId {
    /// Channel by its position in a recording row
    pub fn from_index(index: usize) -> Option<Self> {
        if index >= CHANNEL_COUNT {
            return None;
        }
        let unit = BodyUnit::ALL[index / CODES_PER_UNIT];
        Some(ChannelId { unit, index })
    }

    pub fn from_column_name(name: &str) -> Option<Self> {
        column_names()
            .iter()
            .position(|column| column == name)
            .and_then(Self::from_index)
    }

    /// Sensor code within the unit, e.g. `zgyro`
    pub fn code(&self) -> &'static str {
        SENSOR_CODES[self.index % CODES_PER_UNIT]
    }

    pub fn label(&self) -> &'static str {
        SENSOR_LABELS[self.index % CODES_PER_UNIT]
    }

    pub fn column_name(&self) -> String {
        format!("{}_{}", self.unit.code(), self.code())
    }
}

/// The 45 channel column names in dataset order (unit-major)
pub fn column_names() -> Vec<String> {
    BodyUnit::ALL
        .iter()
        .flat_map(|unit| SENSOR_CODES.iter().map(move |code| format!("{}_{}", unit.code(), code)))
        .collect()
}

/// Resolved columns and labels for one unit + category, ordered X, Y, Z
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChannelSelection {
    pub unit: BodyUnit,
    pub category: SensorCategory,
    pub channels: [ChannelId; 3],
    pub labels: [&'static str; 3],
}

impl ChannelSelection {
    pub fn column_names(&self) -> [String; 3] {
        self.channels.map(|channel| channel.column_name())
    }

    pub fn channel(&self, axis: Axis) -> ChannelId {
        self.channels[axis.position()]
    }

    pub fn label(&self, axis: Axis) -> &'static str {
        self.labels[axis.position()]
    }
}

/// Resolve the three columns of `category` on `unit`.
///
/// Equivalent to filtering [`SENSOR_CODES`] by the category suffix and
/// [`SENSOR_LABELS`] by the label fragment; the vocabulary declares each
/// category as a contiguous X, Y, Z run, so the order is never re-sorted.
pub fn resolve_channels(category: SensorCategory, unit: BodyUnit) -> ChannelSelection {
    let first = SENSOR_CODES
        .iter()
        .position(|code| code.contains(category.code_suffix()))
        .unwrap_or(0);
    let base = unit.column_offset() + first;

    let channels = Axis::ALL.map(|axis| ChannelId {
        unit,
        index: base + axis.position(),
    });
    let labels = channels.map(|channel| channel.label());

    ChannelSelection {
        unit,
        category,
        channels,
        labels,
    }
}

impl std::fmt::Display for UnitGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnitGroup::Torso => write!(f, "Torso"),
            UnitGroup::Arms => write!(f, "Arms"),
            UnitGroup::Legs => write!(f, "Legs"),
        }
    }
}

impl std::fmt::Display for SensorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.letter().to_ascii_uppercase())
    }
}

impl std::fmt::Display for BodyUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BodyUnit::Torso => write!(f, "Torso"),
            BodyUnit::RightArm => write!(f, "Right Arm"),
            BodyUnit::LeftArm => write!(f, "Left Arm"),
            BodyUnit::RightLeg => write!(f, "Right Leg"),
            BodyUnit::LeftLeg => write!(f, "Left Leg"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_names_unit_major() {
        let names = column_names();
        assert_eq!(names.len(), CHANNEL_COUNT);
        assert_eq!(names[0], "T_xacc");
        assert_eq!(names[8], "T_zmag");
        assert_eq!(names[9], "RA_xacc");
        assert_eq!(names[18], "LA_xacc");
        assert_eq!(names[27], "RL_xacc");
        assert_eq!(names[44], "LL_zmag");
    }

    #[test]
    fn test_resolution_matches_substring_filter() {
        for unit in BodyUnit::ALL {
            for category in SensorCategory::ALL {
                let selection = resolve_channels(category, unit);

                let expected_codes: Vec<String> = SENSOR_CODES
                    .iter()
                    .filter(|code| code.contains(category.code_suffix()))
                    .map(|code| format!("{}_{}", unit.code(), code))
                    .collect();
                let expected_labels: Vec<&str> = SENSOR_LABELS
                    .iter()
                    .copied()
                    .filter(|label| label.contains(category.label_fragment()))
                    .collect();

                assert_eq!(selection.column_names().to_vec(), expected_codes);
                assert_eq!(selection.labels.to_vec(), expected_labels);
            }
        }
    }

    #[test]
    fn test_resolution_is_xyz_ordered() {
        for unit in BodyUnit::ALL {
            for category in SensorCategory::ALL {
                let selection = resolve_channels(category, unit);
                for (axis, name) in Axis::ALL.iter().zip(selection.column_names()) {
                    let code = name.split('_').nth(1).unwrap();
                    assert!(code.starts_with(axis.letter()), "{} for {:?}", name, axis);
                    assert!(code.ends_with(category.code_suffix()));
                }
                for (axis, label) in Axis::ALL.iter().zip(selection.labels) {
                    assert!(label.starts_with(&axis.to_string()));
                }
            }
        }
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let first = resolve_channels(SensorCategory::Gyroscope, BodyUnit::LeftLeg);
        let second = resolve_channels(SensorCategory::Gyroscope, BodyUnit::LeftLeg);
        assert_eq!(first, second);
        assert_eq!(
            first.column_names(),
            ["LL_xgyro".to_string(), "LL_ygyro".to_string(), "LL_zgyro".to_string()]
        );
    }

    #[test]
    fn test_selection_serializes_labels() {
        let selection = resolve_channels(SensorCategory::Magnetometer, BodyUnit::RightArm);
        let value = serde_json::to_value(&selection).unwrap();
        assert_eq!(value["labels"][1], "Y Magnetic Fields");
        assert_eq!(value["labels"].as_array().map(|labels| labels.len()), Some(3));
    }

    #[test]
    fn test_channel_lookup_by_name() {
        let channel = ChannelId::from_column_name("RA_ymag").unwrap();
        assert_eq!(channel.unit, BodyUnit::RightArm);
        assert_eq!(channel.label(), "Y Magnetic Fields");
        assert_eq!(channel.column_name(), "RA_ymag");
        assert!(ChannelId::from_column_name("segment").is_none());
        assert!(ChannelId::from_index(CHANNEL_COUNT).is_none());
    }

    #[test]
    fn test_unit_titles() {
        assert_eq!(BodyUnit::Torso.title(), "Torso");
        assert_eq!(BodyUnit::LeftArm.title(), "Left Arms");
        assert_eq!(BodyUnit::RightArm.title(), "Right Arms");
        assert_eq!(BodyUnit::LeftLeg.title(), "Left Legs");
        assert_eq!(BodyUnit::RightLeg.title(), "Right Legs");
    }

    #[test]
    fn test_group_units() {
        assert_eq!(UnitGroup::Torso.units(), &[BodyUnit::Torso]);
        for group in UnitGroup::ALL {
            for unit in group.units() {
                assert_eq!(unit.group(), group);
            }
        }
    }
}
