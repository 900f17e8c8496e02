use proptest::prelude::*;
use slircd_modecore::security::{ExtendedBanMask, ParsedMask};

fn normalise(raw: &str) -> String {
    ExtendedBanMask::parse(raw).to_string()
}

proptest! {
    #[test]
    fn test_normalisation_is_idempotent(raw in "[a-z*?!@#:./]{0,24}") {
        let once = normalise(&raw);
        prop_assert_eq!(normalise(&once), once);
    }

    #[test]
    fn test_hostmasks_always_have_three_fields(raw in "[a-z*!@#.]{0,24}") {
        if let ParsedMask::Mask(mask) = ExtendedBanMask::parse(&raw) {
            prop_assert!(!mask.nick.is_empty());
            prop_assert!(!mask.ident.is_empty());
            prop_assert!(!mask.host.is_empty());
            prop_assert!(mask.channel.is_empty() || mask.channel.starts_with('#'));
        }
    }
}

#[test]
fn test_documented_forms() {
    assert_eq!(normalise("nick!ident@host"), "nick!ident@host");
    assert_eq!(normalise("nick!ident@host#chan"), "nick!ident@host#chan");
    assert_eq!(normalise("nick@host#chan"), "*!nick@host#chan");
    assert_eq!(normalise("nick!ident#chan"), "nick!ident@*#chan");
    assert_eq!(normalise("nick#chan"), "nick!*@*#chan");
}
