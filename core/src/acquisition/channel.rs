use crate::prelude::{SynthError, SynthResult};

/// Extracts the integer index from a channel name of the form `<prefix><digits>`,
/// e.g. `channel3` or `ch12`.
pub fn parse_channel_index(name: &str) -> SynthResult<usize> {
    let digits_start = name
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map(|(idx, _)| idx)
        .ok_or_else(|| {
            SynthError::Layout(format!("channel name `{}` has no index suffix", name))
        })?;
    if digits_start == 0 {
        return Err(SynthError::Layout(format!(
            "channel name `{}` has no prefix",
            name
        )));
    }
    name[digits_start..]
        .parse::<usize>()
        .map_err(|err| SynthError::Layout(format!("channel name `{}`: {}", name, err)))
}

/// Parses every channel name and checks the indices are distinct and fit the
/// declared channel count.
pub fn channel_indices(names: &[String]) -> SynthResult<Vec<usize>> {
    let indices = names
        .iter()
        .map(|name| parse_channel_index(name))
        .collect::<SynthResult<Vec<_>>>()?;

    let mut seen = vec![false; indices.len()];
    for (&index, name) in indices.iter().zip(names) {
        let slot = seen.get_mut(index).ok_or_else(|| {
            SynthError::Layout(format!(
                "channel `{}` index {} exceeds declared channel count {}",
                name,
                index,
                names.len()
            ))
        })?;
        if *slot {
            return Err(SynthError::Layout(format!(
                "channel index {} declared twice",
                index
            )));
        }
        *slot = true;
    }
    Ok(indices)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn parses_trailing_digits() {
        assert_eq!(parse_channel_index("channel0").unwrap(), 0);
        assert_eq!(parse_channel_index("ch12").unwrap(), 12);
    }

    #[test]
    fn rejects_missing_prefix_or_suffix() {
        assert!(parse_channel_index("channel").is_err());
        assert!(parse_channel_index("7").is_err());
        assert!(parse_channel_index("").is_err());
    }

    #[test]
    fn indices_must_be_distinct_and_in_range() {
        assert_eq!(
            channel_indices(&names(&["channel1", "channel0"])).unwrap(),
            vec![1, 0]
        );
        assert!(channel_indices(&names(&["channel0", "channel0"])).is_err());
        assert!(channel_indices(&names(&["channel0", "channel2"])).is_err());
    }
}
