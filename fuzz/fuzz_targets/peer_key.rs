#![no_main]

use fractus_crypto::{PeerPublicKey, PublicKeyFormat};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Peer keys arrive straight off the wire: parsing must never panic,
    // and anything accepted must lie on the supported curve.
    for format in [PublicKeyFormat::X509, PublicKeyFormat::Sec1Uncompressed] {
        if let Ok(peer) = PeerPublicKey::from_encoded(data, format) {
            assert_eq!(peer.domain().name(), "secp521r1");
            assert_eq!(peer.is_identity(), peer.public_key().is_none());
        }
    }
});
