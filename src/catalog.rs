//! Static building catalog.
//!
//! Every building type has exactly one immutable [`BuildingInfo`] entry. The
//! table is reference data only; nothing in the simulation writes to it.

use serde::{Deserialize, Serialize};

/// Highest level a building can be upgraded to.
pub const MAX_LEVEL: u8 = 3;

/// Fraction of the catalog cost returned when a building is demolished.
pub const DEMOLITION_REFUND_RATE: f64 = 0.25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildingType {
    Empty,
    Residential,
    Commercial,
    Industrial,
    Park,
    Road,
    Power,
    Hospital,
    School,
    FireStation,
    Police,
}

impl BuildingType {
    pub const COUNT: usize = 11;

    pub const ALL: [BuildingType; Self::COUNT] = [
        BuildingType::Empty,
        BuildingType::Residential,
        BuildingType::Commercial,
        BuildingType::Industrial,
        BuildingType::Park,
        BuildingType::Road,
        BuildingType::Power,
        BuildingType::Hospital,
        BuildingType::School,
        BuildingType::FireStation,
        BuildingType::Police,
    ];

    pub fn info(self) -> &'static BuildingInfo {
        match self {
            BuildingType::Empty => &EMPTY,
            BuildingType::Residential => &RESIDENTIAL,
            BuildingType::Commercial => &COMMERCIAL,
            BuildingType::Industrial => &INDUSTRIAL,
            BuildingType::Park => &PARK,
            BuildingType::Road => &ROAD,
            BuildingType::Power => &POWER,
            BuildingType::Hospital => &HOSPITAL,
            BuildingType::School => &SCHOOL,
            BuildingType::FireStation => &FIRE_STATION,
            BuildingType::Police => &POLICE,
        }
    }

    pub fn is_empty(self) -> bool {
        self == BuildingType::Empty
    }

    /// Stable identifier used in scenario files and saves.
    pub fn id(self) -> &'static str {
        match self {
            BuildingType::Empty => "empty",
            BuildingType::Residential => "residential",
            BuildingType::Commercial => "commercial",
            BuildingType::Industrial => "industrial",
            BuildingType::Park => "park",
            BuildingType::Road => "road",
            BuildingType::Power => "power",
            BuildingType::Hospital => "hospital",
            BuildingType::School => "school",
            BuildingType::FireStation => "fire_station",
            BuildingType::Police => "police",
        }
    }
}

/// Toolbar order, demolition last.
pub const BUILD_ORDER: [BuildingType; BuildingType::COUNT] = [
    BuildingType::Residential,
    BuildingType::Commercial,
    BuildingType::Industrial,
    BuildingType::Park,
    BuildingType::Road,
    BuildingType::Power,
    BuildingType::Hospital,
    BuildingType::School,
    BuildingType::FireStation,
    BuildingType::Police,
    BuildingType::Empty,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Need {
    Shopping,
    Entertainment,
    Work,
    Health,
    Education,
}

impl Need {
    /// Evaluation order used when picking the most pressing need.
    pub const ALL: [Need; 5] = [
        Need::Shopping,
        Need::Entertainment,
        Need::Work,
        Need::Health,
        Need::Education,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildingCategory {
    Zone,
    Service,
    Infrastructure,
    Special,
}

impl BuildingCategory {
    pub fn label(self) -> &'static str {
        match self {
            BuildingCategory::Zone => "Zones",
            BuildingCategory::Service => "Services",
            BuildingCategory::Infrastructure => "Infra",
            BuildingCategory::Special => "Other",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BuildingInfo {
    pub building_type: BuildingType,
    pub label: &'static str,
    pub description: &'static str,
    pub category: BuildingCategory,
    pub cost: i64,
    /// Maximum simultaneous visitors at level 1.
    pub capacity: u32,
    pub revenue_per_visit: f64,
    pub upkeep_per_tick: f64,
    pub happiness_effect: f64,
    /// Residents housed at level 1 (residential only).
    pub pop_capacity: u32,
    pub need_fulfilled: Option<Need>,
    pub fulfill_amount: f64,
    /// Ticks a citizen spends inside per visit.
    pub visit_duration: u32,
    /// Zero means the building cannot be upgraded.
    pub upgrade_cost_mult: f64,
}

impl BuildingInfo {
    /// Visitor capacity at the given level, floored.
    pub fn effective_capacity(&self, level: u8) -> u32 {
        (self.capacity as f64 * level_multiplier(level)).floor() as u32
    }

    pub fn demolition_refund(&self) -> i64 {
        (self.cost as f64 * DEMOLITION_REFUND_RATE).round() as i64
    }
}

/// Scales every level-dependent quantity: 1.0, 1.5 and 2.0 for levels 1 to 3.
pub fn level_multiplier(level: u8) -> f64 {
    1.0 + (level.max(1) - 1) as f64 * 0.5
}

/// Cost of upgrading a building from `current_level` to the next level.
///
/// Returns `None` when the type cannot be upgraded or is already at
/// [`MAX_LEVEL`].
pub fn upgrade_cost(building_type: BuildingType, current_level: u8) -> Option<i64> {
    let info = building_type.info();
    if info.upgrade_cost_mult == 0.0 || current_level >= MAX_LEVEL {
        return None;
    }
    Some((info.cost as f64 * info.upgrade_cost_mult * current_level as f64).round() as i64)
}

const EMPTY: BuildingInfo = BuildingInfo {
    building_type: BuildingType::Empty,
    label: "Clear",
    description: "Demolish building",
    category: BuildingCategory::Special,
    cost: 0,
    capacity: 0,
    revenue_per_visit: 0.0,
    upkeep_per_tick: 0.0,
    happiness_effect: 0.0,
    pop_capacity: 0,
    need_fulfilled: None,
    fulfill_amount: 0.0,
    visit_duration: 0,
    upgrade_cost_mult: 0.0,
};

const RESIDENTIAL: BuildingInfo = BuildingInfo {
    building_type: BuildingType::Residential,
    label: "House",
    description: "Home for 4 citizens",
    category: BuildingCategory::Zone,
    cost: 100,
    capacity: 0,
    revenue_per_visit: 0.0,
    upkeep_per_tick: 2.0,
    happiness_effect: 0.0,
    pop_capacity: 4,
    need_fulfilled: None,
    fulfill_amount: 0.0,
    visit_duration: 0,
    upgrade_cost_mult: 1.5,
};

const COMMERCIAL: BuildingInfo = BuildingInfo {
    building_type: BuildingType::Commercial,
    label: "Shop",
    description: "Citizens shop here for $8/visit",
    category: BuildingCategory::Zone,
    cost: 200,
    capacity: 6,
    revenue_per_visit: 8.0,
    upkeep_per_tick: 3.0,
    happiness_effect: 1.0,
    pop_capacity: 0,
    need_fulfilled: Some(Need::Shopping),
    fulfill_amount: 40.0,
    visit_duration: 3,
    upgrade_cost_mult: 1.5,
};

const INDUSTRIAL: BuildingInfo = BuildingInfo {
    building_type: BuildingType::Industrial,
    label: "Factory",
    description: "Workers earn $12/shift",
    category: BuildingCategory::Zone,
    cost: 300,
    capacity: 8,
    revenue_per_visit: 12.0,
    upkeep_per_tick: 5.0,
    happiness_effect: -3.0,
    pop_capacity: 0,
    need_fulfilled: Some(Need::Work),
    fulfill_amount: 50.0,
    visit_duration: 5,
    upgrade_cost_mult: 1.5,
};

const PARK: BuildingInfo = BuildingInfo {
    building_type: BuildingType::Park,
    label: "Park",
    description: "Free entertainment, +6 happy",
    category: BuildingCategory::Infrastructure,
    cost: 50,
    capacity: 10,
    revenue_per_visit: 0.0,
    upkeep_per_tick: 1.0,
    happiness_effect: 6.0,
    pop_capacity: 0,
    need_fulfilled: Some(Need::Entertainment),
    fulfill_amount: 35.0,
    visit_duration: 2,
    upgrade_cost_mult: 1.2,
};

const ROAD: BuildingInfo = BuildingInfo {
    building_type: BuildingType::Road,
    label: "Road",
    description: "Connects areas, speeds travel",
    category: BuildingCategory::Infrastructure,
    cost: 25,
    capacity: 0,
    revenue_per_visit: 0.0,
    upkeep_per_tick: 0.0,
    happiness_effect: 0.0,
    pop_capacity: 0,
    need_fulfilled: None,
    fulfill_amount: 0.0,
    visit_duration: 0,
    upgrade_cost_mult: 0.0,
};

const POWER: BuildingInfo = BuildingInfo {
    building_type: BuildingType::Power,
    label: "Power",
    description: "Powers 20 buildings",
    category: BuildingCategory::Infrastructure,
    cost: 500,
    capacity: 0,
    revenue_per_visit: 0.0,
    upkeep_per_tick: 8.0,
    happiness_effect: -2.0,
    pop_capacity: 0,
    need_fulfilled: None,
    fulfill_amount: 0.0,
    visit_duration: 0,
    upgrade_cost_mult: 2.0,
};

const HOSPITAL: BuildingInfo = BuildingInfo {
    building_type: BuildingType::Hospital,
    label: "Hospital",
    description: "Heals citizens, +4 happy",
    category: BuildingCategory::Service,
    cost: 400,
    capacity: 4,
    revenue_per_visit: 0.0,
    upkeep_per_tick: 6.0,
    happiness_effect: 4.0,
    pop_capacity: 0,
    need_fulfilled: Some(Need::Health),
    fulfill_amount: 60.0,
    visit_duration: 4,
    upgrade_cost_mult: 1.8,
};

const SCHOOL: BuildingInfo = BuildingInfo {
    building_type: BuildingType::School,
    label: "School",
    description: "Educates citizens, +10% revenue",
    category: BuildingCategory::Service,
    cost: 350,
    capacity: 6,
    revenue_per_visit: 0.0,
    upkeep_per_tick: 4.0,
    happiness_effect: 3.0,
    pop_capacity: 0,
    need_fulfilled: Some(Need::Education),
    fulfill_amount: 45.0,
    visit_duration: 4,
    upgrade_cost_mult: 1.6,
};

const FIRE_STATION: BuildingInfo = BuildingInfo {
    building_type: BuildingType::FireStation,
    label: "Fire Stn",
    description: "Prevents fires, +3 happy",
    category: BuildingCategory::Service,
    cost: 250,
    capacity: 0,
    revenue_per_visit: 0.0,
    upkeep_per_tick: 3.0,
    happiness_effect: 3.0,
    pop_capacity: 0,
    need_fulfilled: None,
    fulfill_amount: 0.0,
    visit_duration: 0,
    upgrade_cost_mult: 1.4,
};

const POLICE: BuildingInfo = BuildingInfo {
    building_type: BuildingType::Police,
    label: "Police",
    description: "+4 happy, reduces crime",
    category: BuildingCategory::Service,
    cost: 300,
    capacity: 0,
    revenue_per_visit: 0.0,
    upkeep_per_tick: 4.0,
    happiness_effect: 4.0,
    pop_capacity: 0,
    need_fulfilled: None,
    fulfill_amount: 0.0,
    visit_duration: 0,
    upgrade_cost_mult: 1.5,
};
