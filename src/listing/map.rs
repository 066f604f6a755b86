use crate::api::types::FilterField;
use crate::config::Config;
use crate::models::{PropertyId, PropertySummary};

/// Point and radius picked by clicking the map
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapSelection {
    pub latitude: f64,
    pub longitude: f64,
    pub radius_km: f64,
}

impl MapSelection {
    pub fn new(latitude: f64, longitude: f64, radius_km: f64) -> Self {
        Self {
            latitude,
            longitude,
            radius_km,
        }
    }

    /// Filter edits that turn this selection into a geo search
    pub fn changes(&self) -> [FilterField; 3] {
        [
            FilterField::Latitude(Some(self.latitude)),
            FilterField::Longitude(Some(self.longitude)),
            FilterField::Radius(Some(self.radius_km)),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub property_id: PropertyId,
    pub position: (f64, f64),
    pub title: String,
    pub subtitle: String,
    pub price: String,
    pub rooms: String,
    pub distance: Option<String>,
    pub image: Option<String>,
}

impl Marker {
    fn from_property(property: &PropertySummary) -> Self {
        Self {
            property_id: property.id,
            position: property.position(),
            title: property.name.clone(),
            subtitle: format!("{}, {}", property.city, property.country),
            price: format!("{} {}/night", property.base_price_per_night, property.currency),
            rooms: format!("{} bed · {} bath", property.bedrooms, property.bathrooms),
            distance: property.distance.map(|d| format!("{d} km away")),
            image: property.primary_image.clone(),
        }
    }
}

/// Search center marker plus its radius circle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchArea {
    pub center: (f64, f64),
    pub radius_km: f64,
}

impl SearchArea {
    pub fn radius_meters(&self) -> f64 {
        self.radius_km * 1000.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapScene {
    pub center: (f64, f64),
    pub zoom: u8,
    pub markers: Vec<Marker>,
    pub search_area: Option<SearchArea>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MapView {
    /// The rendering surface is not ready yet
    Placeholder(&'static str),
    Ready(MapScene),
}

/// Turns results into markers and clicks into geo searches.
///
/// Holds at most one selection; each click replaces the previous one.
#[derive(Debug, Clone)]
pub struct MapBridge {
    mounted: bool,
    zoom: u8,
    default_radius_km: f64,
    selection: Option<MapSelection>,
}

impl MapBridge {
    pub fn new(zoom: u8, default_radius_km: f64) -> Self {
        Self {
            mounted: false,
            zoom,
            default_radius_km,
            selection: None,
        }
    }

    /// Zoom and click radius taken from the loaded configuration
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.map_zoom, config.default_radius_km)
    }

    /// Called once the rendering surface exists
    pub fn mount(&mut self) {
        self.mounted = true;
    }

    pub fn selection(&self) -> Option<MapSelection> {
        self.selection
    }

    /// Record a click at (lat, lng) and return the selection to feed the controller
    pub fn click(&mut self, latitude: f64, longitude: f64, current_radius: Option<f64>) -> MapSelection {
        let selection = MapSelection::new(
            latitude,
            longitude,
            current_radius.unwrap_or(self.default_radius_km),
        );
        self.selection = Some(selection);
        selection
    }

    pub fn render(&self, properties: &[PropertySummary], center: (f64, f64)) -> MapView {
        if !self.mounted {
            return MapView::Placeholder("Loading map...");
        }

        MapView::Ready(MapScene {
            center,
            zoom: self.zoom,
            markers: properties.iter().map(Marker::from_property).collect(),
            search_area: self.selection.map(|s| SearchArea {
                center: (s.latitude, s.longitude),
                radius_km: s.radius_km,
            }),
        })
    }
}
