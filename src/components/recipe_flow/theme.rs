//! Visual theming for the recipe diagram.
//!
//! Provides colors and per-element style configuration plus named presets.

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Color {
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// Lighten the color by a factor (0.0 = unchanged, 1.0 = white)
	pub fn lighten(self, factor: f64) -> Self {
		let f = factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 + (255.0 - self.r as f64) * f) as u8,
			g: (self.g as f64 + (255.0 - self.g as f64) * f) as u8,
			b: (self.b as f64 + (255.0 - self.b as f64) * f) as u8,
			a: self.a,
		}
	}

	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// Background style configuration.
#[derive(Clone, Debug)]
pub struct BackgroundStyle {
	/// Primary background color
	pub color: Color,
	/// Secondary color for the radial gradient
	pub color_secondary: Color,
	pub use_gradient: bool,
}

/// Edge visual style.
#[derive(Clone, Debug)]
pub struct EdgeStyle {
	/// Ingredient -> junction edges, drawn dashed.
	pub combine_color: Color,
	/// Junction -> result edges, drawn solid with an arrowhead.
	pub produce_color: Color,
	pub combine_width: f64,
	pub produce_width: f64,
	/// Dash length and gap for combine edges.
	pub dash: (f64, f64),
	pub arrow_size: f64,
	pub label_color: Color,
}

/// Node visual style.
#[derive(Clone, Debug)]
pub struct NodeStyle {
	pub fill: Color,
	/// Fill of the tree's root element.
	pub root_fill: Color,
	pub border_color: Color,
	pub border_width: f64,
	pub corner_radius: f64,
	pub text_color: Color,
	pub junction_color: Color,
}

/// Complete visual theme.
#[derive(Clone, Debug)]
pub struct Theme {
	pub name: &'static str,
	pub background: BackgroundStyle,
	pub edge: EdgeStyle,
	pub node: NodeStyle,
	/// CSS font for node labels.
	pub label_font: String,
	/// CSS font for edge labels.
	pub edge_font: String,
}

impl Theme {
	/// Dark slate theme (default)
	pub fn default_theme() -> Self {
		Self {
			name: "default",
			background: BackgroundStyle {
				color: Color::rgb(22, 27, 34),
				color_secondary: Color::rgb(30, 35, 42),
				use_gradient: true,
			},
			edge: EdgeStyle {
				combine_color: Color::rgba(140, 160, 180, 0.7),
				produce_color: Color::rgb(76, 175, 80),
				combine_width: 1.5,
				produce_width: 2.0,
				dash: (5.0, 5.0),
				arrow_size: 8.0,
				label_color: Color::rgba(200, 210, 220, 0.9),
			},
			node: NodeStyle {
				fill: Color::rgb(94, 129, 172),
				root_fill: Color::rgb(180, 136, 100),
				border_color: Color::rgba(255, 255, 255, 0.25),
				border_width: 1.0,
				corner_radius: 6.0,
				text_color: Color::rgb(255, 255, 255),
				junction_color: Color::rgb(140, 160, 180),
			},
			label_font: "14px sans-serif".to_string(),
			edge_font: "11px sans-serif".to_string(),
		}
	}

	/// Light theme close to a plain flowchart look
	pub fn paper() -> Self {
		Self {
			name: "paper",
			background: BackgroundStyle {
				color: Color::rgb(250, 250, 250),
				color_secondary: Color::rgb(250, 250, 250),
				use_gradient: false,
			},
			edge: EdgeStyle {
				combine_color: Color::rgb(120, 120, 120),
				produce_color: Color::rgb(76, 175, 80),
				combine_width: 1.5,
				produce_width: 2.0,
				dash: (5.0, 5.0),
				arrow_size: 8.0,
				label_color: Color::rgb(60, 60, 60),
			},
			node: NodeStyle {
				fill: Color::rgb(255, 255, 255),
				root_fill: Color::rgb(255, 243, 224),
				border_color: Color::rgb(30, 30, 30),
				border_width: 1.0,
				corner_radius: 3.0,
				text_color: Color::rgb(30, 30, 30),
				junction_color: Color::rgb(120, 120, 120),
			},
			label_font: "14px sans-serif".to_string(),
			edge_font: "11px sans-serif".to_string(),
		}
	}

	/// Warm earth tones theme
	pub fn ember() -> Self {
		Self {
			name: "ember",
			background: BackgroundStyle {
				color: Color::rgb(28, 24, 22),
				color_secondary: Color::rgb(35, 30, 28),
				use_gradient: true,
			},
			edge: EdgeStyle {
				combine_color: Color::rgba(160, 130, 110, 0.7),
				produce_color: Color::rgb(185, 145, 110),
				combine_width: 1.5,
				produce_width: 2.0,
				dash: (5.0, 5.0),
				arrow_size: 8.0,
				label_color: Color::rgba(230, 210, 190, 0.9),
			},
			node: NodeStyle {
				fill: Color::rgb(145, 120, 95),
				root_fill: Color::rgb(180, 120, 100),
				border_color: Color::rgba(255, 255, 255, 0.2),
				border_width: 1.0,
				corner_radius: 6.0,
				text_color: Color::rgb(255, 248, 240),
				junction_color: Color::rgb(175, 150, 120),
			},
			label_font: "14px sans-serif".to_string(),
			edge_font: "11px sans-serif".to_string(),
		}
	}

	/// Looks up a preset by name, falling back to the default theme.
	pub fn named(name: &str) -> Self {
		match name {
			"paper" => Self::paper(),
			"ember" => Self::ember(),
			_ => Self::default_theme(),
		}
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self::default_theme()
	}
}
