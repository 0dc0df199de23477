//! Utilidades geoespaciales
//!
//! Distancia de círculo máximo (haversine) sobre una esfera y el bounding
//! box grueso de Noruega que se usa como pre-filtro barato antes del
//! cálculo de distancias.

const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Distancia en metros entre dos coordenadas (aproximación esférica)
pub fn distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let delta_phi = (lat2 - lat1).to_radians();
    let delta_lambda = (lon2 - lon1).to_radians();

    let a = (delta_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_METERS * c
}

/// Bounding box rectangular - esquinas en el mismo orden que el filtro
#[derive(Debug, Clone, Copy)]
pub struct BoundingBox {
    pub top_left_lat: f64,
    pub top_left_lon: f64,
    pub bottom_right_lat: f64,
    pub bottom_right_lon: f64,
}

impl BoundingBox {
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        self.top_left_lon <= lon
            && lon <= self.bottom_right_lon
            && self.top_left_lat >= lat
            && lat >= self.bottom_right_lat
    }
}

/// Bounding box rudimentario de Noruega
pub const NORWAY_BBOX: BoundingBox = BoundingBox {
    top_left_lat: 80.6571442736,
    top_left_lon: 4.99207807783,
    bottom_right_lat: 58.0788841824,
    bottom_right_lon: 31.29341841,
};
