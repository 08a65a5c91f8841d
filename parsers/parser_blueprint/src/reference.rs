/// Sentinel text the game data uses for an unset enum or reference
pub const NONE_TEXT: &str = "None";

/// Prefix marking a back-reference to another blueprint
pub const BP_PREFIX: &str = "!bp_";

/// One of the three encodings a blueprint reference string can take
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlueprintRef<'a> {
    /// A bare GUID
    Guid(&'a str),
    /// A `!bp_<guid>` back-reference, holding the GUID without the prefix
    BackRef(&'a str),
    /// `None` or an empty string
    Unset,
}

impl<'a> BlueprintRef<'a> {
    pub fn parse(raw: &'a str) -> Self {
        if raw.is_empty() || raw == NONE_TEXT {
            BlueprintRef::Unset
        } else if let Some(guid) = raw.strip_prefix(BP_PREFIX) {
            BlueprintRef::BackRef(guid)
        } else {
            BlueprintRef::Guid(raw)
        }
    }

    /// The GUID this reference points at, if any
    pub fn guid(&self) -> Option<&'a str> {
        match self {
            BlueprintRef::Guid(guid) | BlueprintRef::BackRef(guid) => Some(guid),
            BlueprintRef::Unset => None,
        }
    }
}

/// Strip the `!bp_` prefix so the reference can be used as a GUID key
pub fn strip_bp_prefix(raw: &str) -> &str {
    raw.strip_prefix(BP_PREFIX).unwrap_or(raw)
}

pub fn is_none_text(raw: &str) -> bool {
    raw == NONE_TEXT
}
