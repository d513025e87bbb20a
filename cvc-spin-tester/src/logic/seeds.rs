use anyhow::{Context, Result, bail};

/// Parse seed tokens: decimal or `0x`-prefixed hex, de-duplicated in order.
pub fn resolve_seed_inputs(raw: &[String]) -> Result<Vec<u64>> {
    let mut seeds: Vec<u64> = Vec::with_capacity(raw.len());
    for token in raw {
        let seed = parse_seed(token)?;
        if !seeds.contains(&seed) {
            seeds.push(seed);
        }
    }
    if seeds.is_empty() {
        bail!("no seeds given");
    }
    Ok(seeds)
}

fn parse_seed(token: &str) -> Result<u64> {
    let token = token.trim();
    if let Some(hex) = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
    {
        return u64::from_str_radix(&hex.replace('_', ""), 16)
            .with_context(|| format!("invalid hex seed `{token}`"));
    }
    token
        .replace('_', "")
        .parse::<u64>()
        .with_context(|| format!("invalid seed `{token}`"))
}
