//! Named colors offered for `System.Drawing.Color` attributes.

/// A standard, non-system named color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KnownColor {
    pub name: &'static str,
    pub rgb: (u8, u8, u8),
}

impl KnownColor {
    /// `#rrggbb`, lowercase.
    pub fn hex(&self) -> String {
        let (r, g, b) = self.rgb;
        format!("#{:02x}{:02x}{:02x}", r, g, b)
    }
}

/// Standard named colors in name order. System (theme) colors are excluded.
pub const KNOWN_COLORS: &[KnownColor] = &[
    KnownColor { name: "AliceBlue", rgb: (0xf0, 0xf8, 0xff) },
    KnownColor { name: "AntiqueWhite", rgb: (0xfa, 0xeb, 0xd7) },
    KnownColor { name: "Aqua", rgb: (0x00, 0xff, 0xff) },
    KnownColor { name: "Aquamarine", rgb: (0x7f, 0xff, 0xd4) },
    KnownColor { name: "Azure", rgb: (0xf0, 0xff, 0xff) },
    KnownColor { name: "Beige", rgb: (0xf5, 0xf5, 0xdc) },
    KnownColor { name: "Bisque", rgb: (0xff, 0xe4, 0xc4) },
    KnownColor { name: "Black", rgb: (0x00, 0x00, 0x00) },
    KnownColor { name: "BlanchedAlmond", rgb: (0xff, 0xeb, 0xcd) },
    KnownColor { name: "Blue", rgb: (0x00, 0x00, 0xff) },
    KnownColor { name: "BlueViolet", rgb: (0x8a, 0x2b, 0xe2) },
    KnownColor { name: "Brown", rgb: (0xa5, 0x2a, 0x2a) },
    KnownColor { name: "BurlyWood", rgb: (0xde, 0xb8, 0x87) },
    KnownColor { name: "CadetBlue", rgb: (0x5f, 0x9e, 0xa0) },
    KnownColor { name: "Chartreuse", rgb: (0x7f, 0xff, 0x00) },
    KnownColor { name: "Chocolate", rgb: (0xd2, 0x69, 0x1e) },
    KnownColor { name: "Coral", rgb: (0xff, 0x7f, 0x50) },
    KnownColor { name: "CornflowerBlue", rgb: (0x64, 0x95, 0xed) },
    KnownColor { name: "Cornsilk", rgb: (0xff, 0xf8, 0xdc) },
    KnownColor { name: "Crimson", rgb: (0xdc, 0x14, 0x3c) },
    KnownColor { name: "Cyan", rgb: (0x00, 0xff, 0xff) },
    KnownColor { name: "DarkBlue", rgb: (0x00, 0x00, 0x8b) },
    KnownColor { name: "DarkCyan", rgb: (0x00, 0x8b, 0x8b) },
    KnownColor { name: "DarkGoldenrod", rgb: (0xb8, 0x86, 0x0b) },
    KnownColor { name: "DarkGray", rgb: (0xa9, 0xa9, 0xa9) },
    KnownColor { name: "DarkGreen", rgb: (0x00, 0x64, 0x00) },
    KnownColor { name: "DarkKhaki", rgb: (0xbd, 0xb7, 0x6b) },
    KnownColor { name: "DarkMagenta", rgb: (0x8b, 0x00, 0x8b) },
    KnownColor { name: "DarkOliveGreen", rgb: (0x55, 0x6b, 0x2f) },
    KnownColor { name: "DarkOrange", rgb: (0xff, 0x8c, 0x00) },
    KnownColor { name: "DarkOrchid", rgb: (0x99, 0x32, 0xcc) },
    KnownColor { name: "DarkRed", rgb: (0x8b, 0x00, 0x00) },
    KnownColor { name: "DarkSalmon", rgb: (0xe9, 0x96, 0x7a) },
    KnownColor { name: "DarkSeaGreen", rgb: (0x8f, 0xbc, 0x8b) },
    KnownColor { name: "DarkSlateBlue", rgb: (0x48, 0x3d, 0x8b) },
    KnownColor { name: "DarkSlateGray", rgb: (0x2f, 0x4f, 0x4f) },
    KnownColor { name: "DarkTurquoise", rgb: (0x00, 0xce, 0xd1) },
    KnownColor { name: "DarkViolet", rgb: (0x94, 0x00, 0xd3) },
    KnownColor { name: "DeepPink", rgb: (0xff, 0x14, 0x93) },
    KnownColor { name: "DeepSkyBlue", rgb: (0x00, 0xbf, 0xff) },
    KnownColor { name: "DimGray", rgb: (0x69, 0x69, 0x69) },
    KnownColor { name: "DodgerBlue", rgb: (0x1e, 0x90, 0xff) },
    KnownColor { name: "Firebrick", rgb: (0xb2, 0x22, 0x22) },
    KnownColor { name: "FloralWhite", rgb: (0xff, 0xfa, 0xf0) },
    KnownColor { name: "ForestGreen", rgb: (0x22, 0x8b, 0x22) },
    KnownColor { name: "Fuchsia", rgb: (0xff, 0x00, 0xff) },
    KnownColor { name: "Gainsboro", rgb: (0xdc, 0xdc, 0xdc) },
    KnownColor { name: "GhostWhite", rgb: (0xf8, 0xf8, 0xff) },
    KnownColor { name: "Gold", rgb: (0xff, 0xd7, 0x00) },
    KnownColor { name: "Goldenrod", rgb: (0xda, 0xa5, 0x20) },
    KnownColor { name: "Gray", rgb: (0x80, 0x80, 0x80) },
    KnownColor { name: "Green", rgb: (0x00, 0x80, 0x00) },
    KnownColor { name: "GreenYellow", rgb: (0xad, 0xff, 0x2f) },
    KnownColor { name: "Honeydew", rgb: (0xf0, 0xff, 0xf0) },
    KnownColor { name: "HotPink", rgb: (0xff, 0x69, 0xb4) },
    KnownColor { name: "IndianRed", rgb: (0xcd, 0x5c, 0x5c) },
    KnownColor { name: "Indigo", rgb: (0x4b, 0x00, 0x82) },
    KnownColor { name: "Ivory", rgb: (0xff, 0xff, 0xf0) },
    KnownColor { name: "Khaki", rgb: (0xf0, 0xe6, 0x8c) },
    KnownColor { name: "Lavender", rgb: (0xe6, 0xe6, 0xfa) },
    KnownColor { name: "LavenderBlush", rgb: (0xff, 0xf0, 0xf5) },
    KnownColor { name: "LawnGreen", rgb: (0x7c, 0xfc, 0x00) },
    KnownColor { name: "LemonChiffon", rgb: (0xff, 0xfa, 0xcd) },
    KnownColor { name: "LightBlue", rgb: (0xad, 0xd8, 0xe6) },
    KnownColor { name: "LightCoral", rgb: (0xf0, 0x80, 0x80) },
    KnownColor { name: "LightCyan", rgb: (0xe0, 0xff, 0xff) },
    KnownColor { name: "LightGoldenrodYellow", rgb: (0xfa, 0xfa, 0xd2) },
    KnownColor { name: "LightGray", rgb: (0xd3, 0xd3, 0xd3) },
    KnownColor { name: "LightGreen", rgb: (0x90, 0xee, 0x90) },
    KnownColor { name: "LightPink", rgb: (0xff, 0xb6, 0xc1) },
    KnownColor { name: "LightSalmon", rgb: (0xff, 0xa0, 0x7a) },
    KnownColor { name: "LightSeaGreen", rgb: (0x20, 0xb2, 0xaa) },
    KnownColor { name: "LightSkyBlue", rgb: (0x87, 0xce, 0xfa) },
    KnownColor { name: "LightSlateGray", rgb: (0x77, 0x88, 0x99) },
    KnownColor { name: "LightSteelBlue", rgb: (0xb0, 0xc4, 0xde) },
    KnownColor { name: "LightYellow", rgb: (0xff, 0xff, 0xe0) },
    KnownColor { name: "Lime", rgb: (0x00, 0xff, 0x00) },
    KnownColor { name: "LimeGreen", rgb: (0x32, 0xcd, 0x32) },
    KnownColor { name: "Linen", rgb: (0xfa, 0xf0, 0xe6) },
    KnownColor { name: "Magenta", rgb: (0xff, 0x00, 0xff) },
    KnownColor { name: "Maroon", rgb: (0x80, 0x00, 0x00) },
    KnownColor { name: "MediumAquamarine", rgb: (0x66, 0xcd, 0xaa) },
    KnownColor { name: "MediumBlue", rgb: (0x00, 0x00, 0xcd) },
    KnownColor { name: "MediumOrchid", rgb: (0xba, 0x55, 0xd3) },
    KnownColor { name: "MediumPurple", rgb: (0x93, 0x70, 0xdb) },
    KnownColor { name: "MediumSeaGreen", rgb: (0x3c, 0xb3, 0x71) },
    KnownColor { name: "MediumSlateBlue", rgb: (0x7b, 0x68, 0xee) },
    KnownColor { name: "MediumSpringGreen", rgb: (0x00, 0xfa, 0x9a) },
    KnownColor { name: "MediumTurquoise", rgb: (0x48, 0xd1, 0xcc) },
    KnownColor { name: "MediumVioletRed", rgb: (0xc7, 0x15, 0x85) },
    KnownColor { name: "MidnightBlue", rgb: (0x19, 0x19, 0x70) },
    KnownColor { name: "MintCream", rgb: (0xf5, 0xff, 0xfa) },
    KnownColor { name: "MistyRose", rgb: (0xff, 0xe4, 0xe1) },
    KnownColor { name: "Moccasin", rgb: (0xff, 0xe4, 0xb5) },
    KnownColor { name: "NavajoWhite", rgb: (0xff, 0xde, 0xad) },
    KnownColor { name: "Navy", rgb: (0x00, 0x00, 0x80) },
    KnownColor { name: "OldLace", rgb: (0xfd, 0xf5, 0xe6) },
    KnownColor { name: "Olive", rgb: (0x80, 0x80, 0x00) },
    KnownColor { name: "OliveDrab", rgb: (0x6b, 0x8e, 0x23) },
    KnownColor { name: "Orange", rgb: (0xff, 0xa5, 0x00) },
    KnownColor { name: "OrangeRed", rgb: (0xff, 0x45, 0x00) },
    KnownColor { name: "Orchid", rgb: (0xda, 0x70, 0xd6) },
    KnownColor { name: "PaleGoldenrod", rgb: (0xee, 0xe8, 0xaa) },
    KnownColor { name: "PaleGreen", rgb: (0x98, 0xfb, 0x98) },
    KnownColor { name: "PaleTurquoise", rgb: (0xaf, 0xee, 0xee) },
    KnownColor { name: "PaleVioletRed", rgb: (0xdb, 0x70, 0x93) },
    KnownColor { name: "PapayaWhip", rgb: (0xff, 0xef, 0xd5) },
    KnownColor { name: "PeachPuff", rgb: (0xff, 0xda, 0xb9) },
    KnownColor { name: "Peru", rgb: (0xcd, 0x85, 0x3f) },
    KnownColor { name: "Pink", rgb: (0xff, 0xc0, 0xcb) },
    KnownColor { name: "Plum", rgb: (0xdd, 0xa0, 0xdd) },
    KnownColor { name: "PowderBlue", rgb: (0xb0, 0xe0, 0xe6) },
    KnownColor { name: "Purple", rgb: (0x80, 0x00, 0x80) },
    KnownColor { name: "Red", rgb: (0xff, 0x00, 0x00) },
    KnownColor { name: "RosyBrown", rgb: (0xbc, 0x8f, 0x8f) },
    KnownColor { name: "RoyalBlue", rgb: (0x41, 0x69, 0xe1) },
    KnownColor { name: "SaddleBrown", rgb: (0x8b, 0x45, 0x13) },
    KnownColor { name: "Salmon", rgb: (0xfa, 0x80, 0x72) },
    KnownColor { name: "SandyBrown", rgb: (0xf4, 0xa4, 0x60) },
    KnownColor { name: "SeaGreen", rgb: (0x2e, 0x8b, 0x57) },
    KnownColor { name: "SeaShell", rgb: (0xff, 0xf5, 0xee) },
    KnownColor { name: "Sienna", rgb: (0xa0, 0x52, 0x2d) },
    KnownColor { name: "Silver", rgb: (0xc0, 0xc0, 0xc0) },
    KnownColor { name: "SkyBlue", rgb: (0x87, 0xce, 0xeb) },
    KnownColor { name: "SlateBlue", rgb: (0x6a, 0x5a, 0xcd) },
    KnownColor { name: "SlateGray", rgb: (0x70, 0x80, 0x90) },
    KnownColor { name: "Snow", rgb: (0xff, 0xfa, 0xfa) },
    KnownColor { name: "SpringGreen", rgb: (0x00, 0xff, 0x7f) },
    KnownColor { name: "SteelBlue", rgb: (0x46, 0x82, 0xb4) },
    KnownColor { name: "Tan", rgb: (0xd2, 0xb4, 0x8c) },
    KnownColor { name: "Teal", rgb: (0x00, 0x80, 0x80) },
    KnownColor { name: "Thistle", rgb: (0xd8, 0xbf, 0xd8) },
    KnownColor { name: "Tomato", rgb: (0xff, 0x63, 0x47) },
    KnownColor { name: "Transparent", rgb: (0xff, 0xff, 0xff) },
    KnownColor { name: "Turquoise", rgb: (0x40, 0xe0, 0xd0) },
    KnownColor { name: "Violet", rgb: (0xee, 0x82, 0xee) },
    KnownColor { name: "Wheat", rgb: (0xf5, 0xde, 0xb3) },
    KnownColor { name: "White", rgb: (0xff, 0xff, 0xff) },
    KnownColor { name: "WhiteSmoke", rgb: (0xf5, 0xf5, 0xf5) },
    KnownColor { name: "Yellow", rgb: (0xff, 0xff, 0x00) },
    KnownColor { name: "YellowGreen", rgb: (0x9a, 0xcd, 0x32) },
];
