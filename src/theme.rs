pub mod catppuccin {
    use nu_ansi_term::Color;
    pub struct Mocha;
    impl Mocha {
        pub const SURFACE2: Color = Color::Rgb(108, 112, 134);  // context window, comments

        pub const RED: Color = Color::Rgb(243, 139, 168);       // error headline, `-`
        pub const PEACH: Color = Color::Rgb(250, 179, 135);     // caret, `,`
        pub const GREEN: Color = Color::Rgb(166, 227, 161);     // timing line, `+`
        pub const SKY: Color = Color::Rgb(137, 220, 235);       // `>`
        pub const TEAL: Color = Color::Rgb(148, 226, 213);      // `<`
        pub const YELLOW: Color = Color::Rgb(249, 226, 175);    // `.`
        pub const MAUVE: Color = Color::Rgb(203, 166, 247);     // `[` `]`
    }
}
