//! Typed OpenTopography global-DEM requests.
//!
//! Requests are built from a [`BoundingBox`] and a [`DemType`] and serialized
//! to a URL of the form:
//!
//! `{base}?demtype={T}&south={S}&north={N}&west={W}&east={E}&outputFormat=GTiff&API_Key={K}`

use crate::{BoundingBox, DemError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// OpenTopography global DEM REST endpoint.
pub const DEFAULT_BASE_URL: &str = "https://portal.opentopography.org/API/globaldem";

/// Public demo API key accepted by OpenTopography for light use.
pub const DEMO_API_KEY: &str = "demoapikeyot2022";

/// Output format requested from the API.
const OUTPUT_FORMAT: &str = "GTiff";

/// DEM products offered by the global DEM endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DemType {
    /// SRTM 90m.
    #[default]
    #[serde(rename = "SRTMGL3")]
    Srtmgl3,
    /// SRTM 30m.
    #[serde(rename = "SRTMGL1")]
    Srtmgl1,
    /// SRTM 30m ellipsoidal.
    #[serde(rename = "SRTMGL1_E")]
    Srtmgl1E,
    /// ALOS World 3D 30m.
    #[serde(rename = "AW3D30")]
    Aw3d30,
    /// ALOS World 3D 30m ellipsoidal.
    #[serde(rename = "AW3D30_E")]
    Aw3d30E,
    /// Global bathymetry and topography at 15 arc-seconds.
    #[serde(rename = "SRTM15Plus")]
    Srtm15Plus,
    /// NASADEM.
    #[serde(rename = "NASADEM")]
    Nasadem,
    /// Copernicus 30m.
    #[serde(rename = "COP30")]
    Cop30,
    /// Copernicus 90m.
    #[serde(rename = "COP90")]
    Cop90,
    /// Continental Europe digital terrain model.
    #[serde(rename = "EU_DTM")]
    EuDtm,
    /// GEDI L3 1km.
    #[serde(rename = "GEDI_L3")]
    GediL3,
    /// GEBCO ice surface.
    #[serde(rename = "GEBCOIceTopo")]
    GebcoIceTopo,
    /// GEBCO sub-ice topography.
    #[serde(rename = "GEBCOSubIceTopo")]
    GebcoSubIceTopo,
}

impl DemType {
    /// All products, in the order they are offered to the user.
    pub const ALL: [DemType; 13] = [
        DemType::Srtmgl3,
        DemType::Srtmgl1,
        DemType::Srtmgl1E,
        DemType::Aw3d30,
        DemType::Aw3d30E,
        DemType::Srtm15Plus,
        DemType::Nasadem,
        DemType::Cop30,
        DemType::Cop90,
        DemType::EuDtm,
        DemType::GediL3,
        DemType::GebcoIceTopo,
        DemType::GebcoSubIceTopo,
    ];

    /// The identifier used in the `demtype` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            DemType::Srtmgl3 => "SRTMGL3",
            DemType::Srtmgl1 => "SRTMGL1",
            DemType::Srtmgl1E => "SRTMGL1_E",
            DemType::Aw3d30 => "AW3D30",
            DemType::Aw3d30E => "AW3D30_E",
            DemType::Srtm15Plus => "SRTM15Plus",
            DemType::Nasadem => "NASADEM",
            DemType::Cop30 => "COP30",
            DemType::Cop90 => "COP90",
            DemType::EuDtm => "EU_DTM",
            DemType::GediL3 => "GEDI_L3",
            DemType::GebcoIceTopo => "GEBCOIceTopo",
            DemType::GebcoSubIceTopo => "GEBCOSubIceTopo",
        }
    }
}

impl fmt::Display for DemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DemType {
    type Err = DemError;

    fn from_str(s: &str) -> Result<Self> {
        DemType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| DemError::UnknownDemType(s.to_string()))
    }
}

/// A validated request for a DEM covering a bounding box.
#[derive(Debug, Clone, PartialEq)]
pub struct DemRequest {
    bounds: BoundingBox,
    dem_type: DemType,
    api_key: String,
    base_url: String,
}

impl DemRequest {
    /// Create a request against the default endpoint using the demo API key.
    ///
    /// Fails if the bounds do not pass [`BoundingBox::validate`].
    pub fn new(bounds: BoundingBox, dem_type: DemType) -> Result<Self> {
        bounds.validate()?;
        Ok(Self {
            bounds,
            dem_type,
            api_key: DEMO_API_KEY.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Use a different API key.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    /// Use a different endpoint (mirrors, test servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Get the requested bounds.
    pub fn bounds(&self) -> &BoundingBox {
        &self.bounds
    }

    /// Get the requested product.
    pub fn dem_type(&self) -> DemType {
        self.dem_type
    }

    /// Get the API key.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Serialize the request to a URL.
    pub fn url(&self) -> String {
        format!(
            "{}?demtype={}&south={}&north={}&west={}&east={}&outputFormat={}&API_Key={}",
            self.base_url,
            self.dem_type,
            self.bounds.south,
            self.bounds.north,
            self.bounds.west,
            self.bounds.east,
            OUTPUT_FORMAT,
            self.api_key
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dem_type_round_trip_names() {
        assert_eq!(DemType::ALL.len(), 13);
        for t in DemType::ALL {
            assert_eq!(t.as_str().parse::<DemType>().expect("should parse"), t);
        }
        assert_eq!(DemType::default(), DemType::Srtmgl3);
    }

    #[test]
    fn test_dem_type_serde_uses_identifiers() {
        for t in DemType::ALL {
            let yaml = serde_yaml::to_string(&t).expect("serialize");
            assert_eq!(yaml.trim(), t.as_str());
            assert_eq!(serde_yaml::from_str::<DemType>(&yaml).expect("deserialize"), t);
        }
        assert_eq!(serde_yaml::to_string(&DemType::Srtmgl1E).expect("serialize").trim(), "SRTMGL1_E");
        assert!(serde_yaml::from_str::<DemType>("Srtmgl1E").is_err());
        assert!(serde_yaml::from_str::<DemType>("cop30").is_err());
    }

    #[test]
    fn test_dem_type_is_case_sensitive() {
        assert!("srtmgl3".parse::<DemType>().is_err());
        assert!("".parse::<DemType>().is_err());
    }

    #[test]
    fn test_url() {
        let bounds = BoundingBox::new(22.0, 22.5, 85.4, 85.8);
        let request = DemRequest::new(bounds, DemType::Srtmgl3).expect("valid bounds");
        assert_eq!(
            request.url(),
            "https://portal.opentopography.org/API/globaldem?demtype=SRTMGL3\
             &south=22&north=22.5&west=85.4&east=85.8&outputFormat=GTiff&API_Key=demoapikeyot2022"
        );
    }

    #[test]
    fn test_url_with_overrides() {
        let bounds = BoundingBox::new(-1.25, 1.0, -70.5, -70.0);
        let request = DemRequest::new(bounds, DemType::Cop30)
            .expect("valid bounds")
            .with_api_key("secret")
            .with_base_url("http://localhost:8080/dem");
        assert_eq!(
            request.url(),
            "http://localhost:8080/dem?demtype=COP30&south=-1.25&north=1&west=-70.5&east=-70\
             &outputFormat=GTiff&API_Key=secret"
        );
    }

    #[test]
    fn test_request_rejects_invalid_bounds() {
        let bounds = BoundingBox::new(22.5, 22.0, 85.4, 85.8);
        assert!(matches!(
            DemRequest::new(bounds, DemType::Srtmgl3),
            Err(DemError::InvalidBounds(_))
        ));
    }
}
