use std::borrow::Cow;

/// Mnemonic for a DNS response code (RFC 1035, RFC 2136, RFC 6891).
pub fn rcode_to_text(rcode: u16) -> Cow<'static, str> {
    let text = match rcode {
        0 => "NOERROR",
        1 => "FORMERR",
        2 => "SERVFAIL",
        3 => "NXDOMAIN",
        4 => "NOTIMP",
        5 => "REFUSED",
        6 => "YXDOMAIN",
        7 => "YXRRSET",
        8 => "NXRRSET",
        9 => "NOTAUTH",
        10 => "NOTZONE",
        16 => "BADVERS",
        other => return Cow::Owned(format!("RCODE{}", other)),
    };
    Cow::Borrowed(text)
}
