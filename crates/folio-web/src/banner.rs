#![forbid(unsafe_code)]

/// A `%c`-styled console line printed once after init.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BannerLine {
    pub text: &'static str,
    pub css: &'static str,
}

impl BannerLine {
    /// Format string for `console.log(format, css)`.
    #[must_use]
    pub fn format(&self) -> String {
        format!("%c{}", self.text)
    }
}

pub const BANNER: [BannerLine; 2] = [
    BannerLine {
        text: "Welcome to my portfolio! 🎵",
        css: "color: #2563eb; font-size: 20px; font-weight: bold;",
    },
    BannerLine {
        text: "Interested in the code? Check out the GitHub repo!",
        css: "color: #64748b; font-size: 14px;",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_carry_style_directive() {
        assert!(BANNER.iter().all(|line| line.format().starts_with("%c")));
        assert_eq!(BANNER[1].format(), "%cInterested in the code? Check out the GitHub repo!");
    }
}
