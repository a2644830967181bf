//! Mercury through Pluto from mean Keplerian elements.
//!
//! Elements and secular rates are the JPL "Keplerian Elements for
//! Approximate Positions of the Major Planets" set valid 3000 BC – 3000 AD
//! (Standish), referred to the J2000 ecliptic and equinox. Heliocentric
//! positions are differenced against the Earth–Moon barycentre and the
//! result is precessed to the equinox of date.
//!
//! Accuracy is a fraction of a degree over the modern era, which is what
//! sign placement needs.

use super::solar::{normalize_degrees, DEG};

/// Mean orbital elements at J2000 and their rates per Julian century.
#[derive(Debug, Clone, Copy)]
struct OrbitalElements {
    /// Semi-major axis, au
    a: (f64, f64),
    /// Eccentricity
    e: (f64, f64),
    /// Inclination, degrees
    i: (f64, f64),
    /// Mean longitude, degrees
    l: (f64, f64),
    /// Longitude of perihelion, degrees
    peri: (f64, f64),
    /// Longitude of the ascending node, degrees
    node: (f64, f64),
    /// Extra mean-anomaly terms (b, c, s, f) for Jupiter outward
    extra: (f64, f64, f64, f64),
}

const NO_EXTRA: (f64, f64, f64, f64) = (0.0, 0.0, 0.0, 0.0);

const MERCURY: OrbitalElements = OrbitalElements {
    a: (0.38709843, 0.00000000),
    e: (0.20563661, 0.00002123),
    i: (7.00559432, -0.00590158),
    l: (252.25166724, 149472.67486623),
    peri: (77.45771895, 0.15940013),
    node: (48.33961819, -0.12214182),
    extra: NO_EXTRA,
};

const VENUS: OrbitalElements = OrbitalElements {
    a: (0.72332102, -0.00000026),
    e: (0.00676399, -0.00005107),
    i: (3.39777545, 0.00043494),
    l: (181.97970850, 58517.81560260),
    peri: (131.76755713, 0.05679648),
    node: (76.67261496, -0.27274174),
    extra: NO_EXTRA,
};

const EARTH_MOON_BARYCENTER: OrbitalElements = OrbitalElements {
    a: (1.00000018, -0.00000003),
    e: (0.01673163, -0.00003661),
    i: (-0.00054346, -0.01337178),
    l: (100.46691572, 35999.37306329),
    peri: (102.93005885, 0.31795260),
    node: (-5.11260389, -0.24123856),
    extra: NO_EXTRA,
};

const MARS: OrbitalElements = OrbitalElements {
    a: (1.52371243, 0.00000097),
    e: (0.09336511, 0.00009149),
    i: (1.85181869, -0.00724757),
    l: (-4.56813164, 19140.29934243),
    peri: (-23.91744784, 0.45223625),
    node: (49.71320984, -0.26852431),
    extra: NO_EXTRA,
};

const JUPITER: OrbitalElements = OrbitalElements {
    a: (5.20248019, -0.00002864),
    e: (0.04853590, 0.00018026),
    i: (1.29861416, -0.00322699),
    l: (34.33479152, 3034.90371757),
    peri: (14.27495244, 0.18199196),
    node: (100.29282654, 0.13024619),
    extra: (-0.00012452, 0.06064060, -0.35635438, 38.35125000),
};

const SATURN: OrbitalElements = OrbitalElements {
    a: (9.54149883, -0.00003065),
    e: (0.05550825, -0.00032044),
    i: (2.49424102, 0.00451969),
    l: (50.07571329, 1222.11494724),
    peri: (92.86136063, 0.54179478),
    node: (113.63998702, -0.25015002),
    extra: (0.00025899, -0.13434469, 0.87320147, 38.35125000),
};

const URANUS: OrbitalElements = OrbitalElements {
    a: (19.18797948, -0.00020455),
    e: (0.04685740, -0.00001550),
    i: (0.77298127, -0.00180155),
    l: (314.20276625, 428.49512595),
    peri: (172.43404441, 0.09266985),
    node: (73.96250215, 0.05739699),
    extra: (0.00058331, -0.97731848, 0.17689245, 7.67025000),
};

const NEPTUNE: OrbitalElements = OrbitalElements {
    a: (30.06952752, 0.00006447),
    e: (0.00895439, 0.00000818),
    i: (1.77005520, 0.00022400),
    l: (304.22289287, 218.46515314),
    peri: (46.68158724, 0.01009938),
    node: (131.78635853, -0.00606302),
    extra: (-0.00041348, 0.68346318, -0.10162547, 7.67025000),
};

const PLUTO: OrbitalElements = OrbitalElements {
    a: (39.48686035, 0.00449751),
    e: (0.24885238, 0.00006016),
    i: (17.14104260, 0.00000501),
    l: (238.96535011, 145.18042903),
    peri: (224.09702598, -0.00968827),
    node: (110.30167986, -0.00809981),
    extra: (-0.01262724, 0.0, 0.0, 0.0),
};

/// Bodies handled by this module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Planet {
    Mercury,
    Venus,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
}

impl Planet {
    fn elements(self) -> &'static OrbitalElements {
        match self {
            Self::Mercury => &MERCURY,
            Self::Venus => &VENUS,
            Self::Mars => &MARS,
            Self::Jupiter => &JUPITER,
            Self::Saturn => &SATURN,
            Self::Uranus => &URANUS,
            Self::Neptune => &NEPTUNE,
            Self::Pluto => &PLUTO,
        }
    }
}

/// Solve Kepler's equation M = E - e sin E for E (radians).
fn eccentric_anomaly(mean_anomaly: f64, e: f64) -> f64 {
    let mut ea = mean_anomaly + e * mean_anomaly.sin();
    for _ in 0..30 {
        let delta = (ea - e * ea.sin() - mean_anomaly) / (1.0 - e * ea.cos());
        ea -= delta;
        if delta.abs() < 1e-12 {
            break;
        }
    }
    ea
}

/// Heliocentric ecliptic position (J2000 frame), au.
fn heliocentric(el: &OrbitalElements, t: f64) -> [f64; 3] {
    let a = el.a.0 + el.a.1 * t;
    let e = el.e.0 + el.e.1 * t;
    let i = (el.i.0 + el.i.1 * t) * DEG;
    let l = el.l.0 + el.l.1 * t;
    let peri = el.peri.0 + el.peri.1 * t;
    let node = el.node.0 + el.node.1 * t;

    let (b, c, s, f) = el.extra;
    let mut m = l - peri + b * t * t;
    if f != 0.0 {
        m += c * (f * t * DEG).cos() + s * (f * t * DEG).sin();
    }
    // Reduce to (-180, 180] so Newton iteration starts near the root.
    let m = (normalize_degrees(m + 180.0) - 180.0) * DEG;

    let w = (peri - node) * DEG;
    let node = node * DEG;

    let ea = eccentric_anomaly(m, e);
    let xp = a * (ea.cos() - e);
    let yp = a * (1.0 - e * e).sqrt() * ea.sin();

    let (sw, cw) = w.sin_cos();
    let (sn, cn) = node.sin_cos();
    let (si, ci) = i.sin_cos();

    [
        (cw * cn - sw * sn * ci) * xp + (-sw * cn - cw * sn * ci) * yp,
        (cw * sn + sw * cn * ci) * xp + (-sw * sn + cw * cn * ci) * yp,
        (sw * si) * xp + (cw * si) * yp,
    ]
}

/// General precession in longitude from J2000 to the equinox of date, degrees.
fn precession(t: f64) -> f64 {
    1.396971 * t + 0.0003086 * t * t
}

/// Geocentric ecliptic longitude of date, degrees in [0, 360).
pub fn planet_longitude(planet: Planet, t: f64) -> f64 {
    let p = heliocentric(planet.elements(), t);
    let earth = heliocentric(&EARTH_MOON_BARYCENTER, t);
    let (dx, dy) = (p[0] - earth[0], p[1] - earth[1]);
    normalize_degrees(dy.atan2(dx) / DEG + precession(t))
}
