/// dump a byte buffer as hex ("X") or printable-char ("C") form, for debug! logging
#[macro_export]
macro_rules! format_buffer {
    ("X", $buf:expr) => {{
        $buf.iter()
            .map(|b| format!("{:02X}", b))
            .collect::<Vec<_>>()
            .join(" ")
    }};
    ("C", $buf:expr) => {{
        $buf.iter()
            .map(|b| {
                if b.is_ascii_graphic() {
                    *b as char
                } else {
                    '.'
                }
            })
            .collect::<String>()
    }};
}
