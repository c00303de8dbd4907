use ferrous_dnsq_application::use_cases::QueryResult;
use ferrous_dnsq_infrastructure::dns::HickoryWireCodec;
use std::fmt::Display;

pub fn render(result: &QueryResult<HickoryWireCodec>, verbose: bool) -> String {
    let mut out = render_summary(
        &result.rcode_text(),
        result.secure(),
        result.ttl(),
        result.answers(),
    );

    if verbose {
        out.push_str(&render_packet(result.message()));
    }
    out
}

fn render_summary<T: Display>(rcode: &str, secure: bool, ttl: u32, answers: &[T]) -> String {
    let mut out = format!(
        "RCODE: {}\nSECURE: {}\nTTL: {}\n\nANSWERS: count={}\n",
        rcode,
        secure,
        ttl,
        answers.len()
    );
    for answer in answers {
        out.push_str(&format!("{}\n", answer));
    }
    out
}

fn render_packet(message: &impl Display) -> String {
    format!("\nFULL RESPONSE PACKET:\n{}\n", message)
}
