/// Opaque RGB color, 8 bits per channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn lerp(self, other: Color, t: f64) -> Self {
        let clamped = t.clamp(0.0, 1.0);
        let r = self.r as f64 + (other.r as f64 - self.r as f64) * clamped;
        let g = self.g as f64 + (other.g as f64 - self.g as f64) * clamped;
        let b = self.b as f64 + (other.b as f64 - self.b as f64) * clamped;
        Self {
            r: r.round() as u8,
            g: g.round() as u8,
            b: b.round() as u8,
        }
    }
}

#[derive(Clone, Copy)]
struct ColorStop {
    at: f64,
    color: Color,
}

const VIRIDIS_STOPS: [ColorStop; 9] = [
    ColorStop {
        at: 0.0,
        color: Color::new(68, 1, 84),
    },
    ColorStop {
        at: 0.125,
        color: Color::new(72, 40, 120),
    },
    ColorStop {
        at: 0.25,
        color: Color::new(62, 74, 137),
    },
    ColorStop {
        at: 0.375,
        color: Color::new(49, 104, 142),
    },
    ColorStop {
        at: 0.5,
        color: Color::new(38, 130, 142),
    },
    ColorStop {
        at: 0.625,
        color: Color::new(31, 158, 137),
    },
    ColorStop {
        at: 0.75,
        color: Color::new(53, 183, 121),
    },
    ColorStop {
        at: 0.875,
        color: Color::new(109, 205, 89),
    },
    ColorStop {
        at: 1.0,
        color: Color::new(253, 231, 37),
    },
];

const MAGMA_STOPS: [ColorStop; 9] = [
    ColorStop {
        at: 0.0,
        color: Color::new(0, 0, 4),
    },
    ColorStop {
        at: 0.125,
        color: Color::new(28, 16, 68),
    },
    ColorStop {
        at: 0.25,
        color: Color::new(79, 18, 123),
    },
    ColorStop {
        at: 0.375,
        color: Color::new(129, 37, 129),
    },
    ColorStop {
        at: 0.5,
        color: Color::new(181, 54, 122),
    },
    ColorStop {
        at: 0.625,
        color: Color::new(229, 80, 100),
    },
    ColorStop {
        at: 0.75,
        color: Color::new(251, 135, 97),
    },
    ColorStop {
        at: 0.875,
        color: Color::new(254, 194, 135),
    },
    ColorStop {
        at: 1.0,
        color: Color::new(252, 253, 191),
    },
];

const GRAY_STOPS: [ColorStop; 2] = [
    ColorStop {
        at: 0.0,
        color: Color::new(0, 0, 0),
    },
    ColorStop {
        at: 1.0,
        color: Color::new(255, 255, 255),
    },
];

/// Value-to-color ramps. Viridis is the default.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorMap {
    #[default]
    Viridis,
    Magma,
    Gray,
}

impl ColorMap {
    fn stops(self) -> &'static [ColorStop] {
        match self {
            ColorMap::Viridis => &VIRIDIS_STOPS,
            ColorMap::Magma => &MAGMA_STOPS,
            ColorMap::Gray => &GRAY_STOPS,
        }
    }

    /// Color at normalized position `t`; `t` outside [0, 1] clamps.
    pub fn sample(self, t: f64) -> Color {
        sample_gradient(self.stops(), t)
    }
}

fn sample_gradient(stops: &[ColorStop], value: f64) -> Color {
    let clamped = value.clamp(0.0, 1.0);
    if clamped <= stops[0].at {
        return stops[0].color;
    }
    for pair in stops.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if clamped <= b.at {
            let span = b.at - a.at;
            let local = if span > 0.0 { (clamped - a.at) / span } else { 1.0 };
            return a.color.lerp(b.color, local);
        }
    }
    stops[stops.len() - 1].color
}
