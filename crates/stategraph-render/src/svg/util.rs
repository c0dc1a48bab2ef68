use std::fmt::Write as _;

pub(crate) fn fmt_number_into(out: &mut String, v: f64) {
    // Whole numbers print without a fraction; float noise and `-0` are dropped.
    if !v.is_finite() {
        out.push('0');
        return;
    }

    let mut v = if v.abs() < 1e-9 { 0.0 } else { v };
    let nearest = v.round();
    if (v - nearest).abs() < 1e-6 {
        v = nearest;
    }
    if v == -0.0 {
        v = 0.0;
    }

    let _ = write!(out, "{v}");
}

pub(crate) fn fmt_number(v: f64) -> String {
    let mut out = String::new();
    fmt_number_into(&mut out, v);
    out
}

pub(crate) fn escape_xml_into(out: &mut String, text: &str) {
    let mut start = 0usize;
    for (i, b) in text.bytes().enumerate() {
        let esc = match b {
            b'&' => "&amp;",
            b'<' => "&lt;",
            b'>' => "&gt;",
            b'"' => "&quot;",
            b'\'' => "&#39;",
            _ => continue,
        };
        if start < i {
            out.push_str(&text[start..i]);
        }
        out.push_str(esc);
        start = i + 1;
    }
    if start < text.len() {
        out.push_str(&text[start..]);
    }
}

pub(crate) fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    escape_xml_into(&mut out, text);
    out
}
