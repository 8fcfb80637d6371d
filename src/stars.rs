//! # Star field
//!
//! Fixed stars given by their J2000 right ascension, declination and visual magnitude,
//! placed on the observer's sky with the same equatorial → horizontal transform as the
//! solar system bodies.
//!
//! ## Catalog format
//!
//! One star per line, comma separated, angles in radians:
//!
//! ```text
//! Sirius,1.767793,-0.291751,-1.46
//! ```
//!
//! Blank lines and lines starting with `#` are ignored.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use itertools::Itertools;
use log::{info, warn};

use crate::{
    bodies::CelestialBodyName,
    constants::{Degree, Radian, RADEG},
    ephemeris_data::EphemerisData,
    horizon::equatorial_to_horizontal,
    sky_errors::SkyError,
};

/// The brightest stars of the sky, plus Polaris.
const BRIGHT_STARS: &str = "\
Sirius,1.767793,-0.291751,-1.46
Canopus,1.675305,-0.919716,-0.72
Rigil Kentaurus,3.838016,-1.061754,-0.27
Arcturus,3.733528,0.334798,-0.04
Vega,4.873565,0.676903,0.03
Capella,1.381817,0.802817,0.08
Rigel,1.372431,-0.143145,0.13
Procyon,2.004083,0.091193,0.34
Achernar,0.426358,-0.998971,0.46
Betelgeuse,1.549728,0.129278,0.50
Hadar,3.681875,-1.053708,0.61
Altair,5.195772,0.154781,0.77
Acrux,3.257650,-1.101287,0.76
Aldebaran,1.203932,0.288142,0.85
Antares,4.317105,-0.461325,0.96
Spica,3.513318,-0.194801,0.97
Pollux,2.030324,0.489149,1.14
Fomalhaut,6.011136,-0.517005,1.16
Deneb,5.416769,0.790290,1.25
Mimosa,3.349816,-1.041766,1.25
Regulus,2.654524,0.208867,1.40
Adhara,1.826601,-0.505659,1.50
Castor,1.983556,0.556556,1.58
Shaula,4.597236,-0.647583,1.62
Gacrux,3.277580,-0.996813,1.63
Bellatrix,1.418652,0.110823,1.64
Elnath,1.423717,0.499293,1.65
Alnilam,1.467009,-0.020977,1.69
Alnair,5.795511,-0.819624,1.74
Alioth,3.377340,0.976683,1.77
Dubhe,2.896060,1.077758,1.79
Mirfak,0.891526,0.870242,1.79
Polaris,0.662433,1.557952,1.97
";

/// Magnitude limit under which a star gets a label.
const LABEL_MAGNITUDE: f64 = 1.8;

#[derive(Debug, Clone, PartialEq)]
pub struct Star {
    pub name: String,
    pub right_ascension: Radian,
    pub declination: Radian,
    pub magnitude: f64,
}

impl FromStr for Star {
    type Err = SkyError;

    /// Parse a `name,ra,dec,mag` record. Line numbers in errors are 0 here; use
    /// [`parse_star_catalog`] for positioned errors.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SkyError::StarParse {
            line: 0,
            content: s.to_string(),
        };

        let (name, ra, dec, mag) = s
            .trim()
            .split(',')
            .map(str::trim)
            .collect_tuple()
            .ok_or_else(invalid)?;
        if name.is_empty() {
            return Err(invalid());
        }
        let number = |field: &str| field.parse::<f64>().map_err(|_| invalid());

        Ok(Star {
            name: name.to_string(),
            right_ascension: number(ra)?,
            declination: number(dec)?,
            magnitude: number(mag)?,
        })
    }
}

impl Star {
    /// Gray level in [0, 1] used to draw the star, fainter stars darker.
    pub fn brightness(&self) -> f64 {
        (1.0 - self.magnitude / 8.0).clamp(0.0, 1.0)
    }

    /// Bright stars and Polaris are labeled.
    pub fn is_labeled(&self) -> bool {
        self.magnitude < LABEL_MAGNITUDE || self.name == "Polaris"
    }
}

/// Parse a whole catalog.
///
/// Return
/// ------
/// * `SkyError::StarParse` naming the first invalid line (1-based).
pub fn parse_star_catalog(text: &str) -> Result<Vec<Star>, SkyError> {
    text.lines()
        .enumerate()
        .filter(|(_, l)| !l.trim().is_empty() && !l.trim_start().starts_with('#'))
        .map(|(i, l)| {
            l.parse::<Star>().map_err(|_| SkyError::StarParse {
                line: i + 1,
                content: l.to_string(),
            })
        })
        .collect()
}

/// Alpha of the star layer: stars fade in as the Sun goes below the horizon and are fully
/// visible once it is 10° down.
pub fn star_alpha(sun_altitude: Degree) -> f64 {
    if sun_altitude > 0.0 {
        0.0
    } else {
        (sun_altitude / 10.0).abs().clamp(0.0, 1.0)
    }
}

/// A star placed on the observer's sky.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedStar<'a> {
    pub star: &'a Star,
    pub azimuth: Radian,
    pub altitude: Radian,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StarField {
    stars: Vec<Star>,
}

impl Default for StarField {
    fn default() -> Self {
        StarField::bright_stars()
    }
}

impl StarField {
    pub fn new(stars: Vec<Star>) -> Self {
        StarField { stars }
    }

    /// The built-in catalog of the brightest stars.
    pub fn bright_stars() -> Self {
        StarField::new(parse_star_catalog(BRIGHT_STARS).unwrap_or_default())
    }

    /// Read a catalog file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SkyError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| SkyError::StarCatalogRead {
            path: path.to_path_buf(),
            source,
        })?;
        let stars = parse_star_catalog(&text)?;
        info!("Loaded {} stars from {}", stars.len(), path.display());
        Ok(StarField::new(stars))
    }

    /// Read a catalog file, falling back to the built-in catalog with a warning.
    pub fn from_file_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        StarField::from_file(path).unwrap_or_else(|err| {
            warn!(
                "Unable to use star field {}, using default star field: {err}",
                path.display()
            );
            StarField::bright_stars()
        })
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    pub fn len(&self) -> usize {
        self.stars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }

    pub fn find(&self, name: &str) -> Option<&Star> {
        self.stars.iter().find(|s| s.name.eq_ignore_ascii_case(name))
    }

    /// Azimuth/altitude of every star for the observer and time of `data`.
    ///
    /// `data` must already hold an up-to-date local sidereal time.
    pub fn place<'a>(&'a self, data: &EphemerisData) -> Vec<PlacedStar<'a>> {
        let latitude = data.latitude * RADEG;
        // parallax scale at 1 AU
        let sun_distance = 1.0;
        self.stars
            .iter()
            .map(|star| {
                let (azimuth, altitude) = equatorial_to_horizontal(
                    star.right_ascension,
                    star.declination,
                    latitude,
                    data.local_sidereal_time,
                    data.altitude,
                    sun_distance,
                );
                PlacedStar {
                    star,
                    azimuth,
                    altitude,
                }
            })
            .collect()
    }

    /// Stars above the horizon, brightest first.
    pub fn visible<'a>(&'a self, data: &EphemerisData) -> Vec<PlacedStar<'a>> {
        self.place(data)
            .into_iter()
            .filter(|p| p.altitude > 0.0)
            .sorted_by(|a, b| a.star.magnitude.total_cmp(&b.star.magnitude))
            .collect()
    }

    /// Star layer alpha for the Sun position published in `data`.
    pub fn alpha(&self, data: &EphemerisData) -> f64 {
        star_alpha(data.body(CelestialBodyName::Sun).altitude / RADEG)
    }
}
