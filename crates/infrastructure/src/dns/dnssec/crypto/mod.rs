use super::types::{DnskeyRecord, DsRecord, RrsigRecord};
use super::zone::to_fqdn;
use ferrous_dnsq_domain::DomainError;
use hickory_proto::dnssec::rdata::sig::SigInput;
use hickory_proto::dnssec::tbs::TBS;
use hickory_proto::dnssec::Algorithm;
use hickory_proto::rr::{DNSClass, Name, Record, SerialNumber};
use ring::signature;
use sha1::Digest as Sha1Digest;
use sha2::{Sha256, Sha384};
use std::str::FromStr;

pub struct SignatureVerifier;

impl SignatureVerifier {
    pub fn supports_algorithm(algorithm: u8) -> bool {
        matches!(algorithm, 5 | 7 | 8 | 10 | 13 | 14 | 15)
    }

    pub fn supports_digest(digest_type: u8) -> bool {
        matches!(digest_type, 1 | 2 | 4)
    }

    /// Checks one RRSIG over `records` (a single RRset owned by `owner`)
    /// against one key, at time `now` (seconds since the epoch).
    ///
    /// `Ok(false)` means the signature is out of its validity window, was
    /// made by another key, or does not verify.
    pub fn verify_rrsig(
        &self,
        rrsig: &RrsigRecord,
        dnskey: &DnskeyRecord,
        owner: &str,
        records: &[Record],
        now: u32,
    ) -> Result<bool, DomainError> {
        if !rrsig.is_valid_at(now) {
            return Ok(false);
        }

        if dnskey.calculate_key_tag() != rrsig.key_tag || dnskey.algorithm != rrsig.algorithm {
            return Ok(false);
        }

        if !Self::supports_algorithm(rrsig.algorithm) {
            return Err(DomainError::InvalidDnsResponse(format!(
                "Unsupported DNSSEC algorithm: {}",
                rrsig.algorithm
            )));
        }

        let name = Name::from_str(&to_fqdn(owner))
            .map_err(|e| DomainError::InvalidDnsResponse(e.to_string()))?;
        let signer_name = Name::from_str(&to_fqdn(&rrsig.signer_name))
            .map_err(|e| DomainError::InvalidDnsResponse(e.to_string()))?;

        let sig_input = SigInput {
            type_covered: rrsig.type_covered,
            algorithm: Algorithm::from_u8(rrsig.algorithm),
            num_labels: rrsig.labels,
            original_ttl: rrsig.original_ttl,
            sig_expiration: SerialNumber::from(rrsig.signature_expiration),
            sig_inception: SerialNumber::from(rrsig.signature_inception),
            key_tag: rrsig.key_tag,
            signer_name,
        };

        let tbs = TBS::from_input(&name, DNSClass::IN, &sig_input, records.iter())
            .map_err(|e| DomainError::InvalidDnsResponse(e.to_string()))?;
        let data = tbs.as_ref();
        let sig = rrsig.signature.as_slice();

        match rrsig.algorithm {
            // RSA zone keys from 1024 bits up.
            5 | 7 => self.verify_rsa(
                &signature::RSA_PKCS1_1024_8192_SHA1_FOR_LEGACY_USE_ONLY,
                data,
                sig,
                dnskey,
            ),
            8 => self.verify_rsa(
                &signature::RSA_PKCS1_1024_8192_SHA256_FOR_LEGACY_USE_ONLY,
                data,
                sig,
                dnskey,
            ),
            10 => self.verify_rsa(
                &signature::RSA_PKCS1_1024_8192_SHA512_FOR_LEGACY_USE_ONLY,
                data,
                sig,
                dnskey,
            ),
            13 => self.verify_ecdsa(&signature::ECDSA_P256_SHA256_FIXED, 64, data, sig, dnskey),
            14 => self.verify_ecdsa(&signature::ECDSA_P384_SHA384_FIXED, 96, data, sig, dnskey),
            _ => self.verify_ed25519(data, sig, dnskey),
        }
    }

    /// Does `ds` (published by the parent) commit to `dnskey` at `owner_name`?
    pub fn verify_ds(
        &self,
        ds: &DsRecord,
        dnskey: &DnskeyRecord,
        owner_name: &str,
    ) -> Result<bool, DomainError> {
        if dnskey.calculate_key_tag() != ds.key_tag || dnskey.algorithm != ds.algorithm {
            return Ok(false);
        }

        let dnskey_data = self.build_dnskey_data(dnskey, owner_name)?;

        let computed_digest = match ds.digest_type {
            1 => {
                let mut hasher = sha1::Sha1::new();
                hasher.update(&dnskey_data);
                hasher.finalize().to_vec()
            }
            2 => {
                let mut hasher = Sha256::new();
                hasher.update(&dnskey_data);
                hasher.finalize().to_vec()
            }
            4 => {
                let mut hasher = Sha384::new();
                hasher.update(&dnskey_data);
                hasher.finalize().to_vec()
            }
            _ => {
                return Err(DomainError::InvalidDnsResponse(format!(
                    "Unsupported DS digest type: {}",
                    ds.digest_type
                )))
            }
        };

        Ok(computed_digest == ds.digest)
    }

    fn verify_rsa(
        &self,
        params: &'static signature::RsaParameters,
        data: &[u8],
        sig: &[u8],
        dnskey: &DnskeyRecord,
    ) -> Result<bool, DomainError> {
        let (exponent, modulus) = self.parse_rsa_key(&dnskey.public_key)?;
        let public_key = signature::RsaPublicKeyComponents {
            n: &modulus,
            e: &exponent,
        };
        Ok(public_key.verify(params, data, sig).is_ok())
    }

    fn verify_ecdsa(
        &self,
        algorithm: &'static signature::EcdsaVerificationAlgorithm,
        point_len: usize,
        data: &[u8],
        sig: &[u8],
        dnskey: &DnskeyRecord,
    ) -> Result<bool, DomainError> {
        if dnskey.public_key.len() != point_len {
            return Err(DomainError::InvalidDnsResponse(format!(
                "Invalid ECDSA public key length: {}",
                dnskey.public_key.len()
            )));
        }

        if sig.len() != point_len {
            return Err(DomainError::InvalidDnsResponse(format!(
                "Invalid ECDSA signature length: {}",
                sig.len()
            )));
        }

        // RFC 6605 keys are the bare point; ring wants the SEC1 form.
        let mut pk = Vec::with_capacity(point_len + 1);
        pk.push(0x04);
        pk.extend_from_slice(&dnskey.public_key);

        let public_key = signature::UnparsedPublicKey::new(algorithm, &pk);
        Ok(public_key.verify(data, sig).is_ok())
    }

    fn verify_ed25519(
        &self,
        data: &[u8],
        sig: &[u8],
        dnskey: &DnskeyRecord,
    ) -> Result<bool, DomainError> {
        if dnskey.public_key.len() != 32 {
            return Err(DomainError::InvalidDnsResponse(
                "Invalid Ed25519 public key length".into(),
            ));
        }

        if sig.len() != 64 {
            return Err(DomainError::InvalidDnsResponse(
                "Invalid Ed25519 signature length".into(),
            ));
        }

        let public_key = signature::UnparsedPublicKey::new(&signature::ED25519, &dnskey.public_key);
        Ok(public_key.verify(data, sig).is_ok())
    }

    /// RFC 3110 §2 key layout: exponent length (one byte, or zero then two
    /// bytes), exponent, modulus.
    fn parse_rsa_key(&self, key_data: &[u8]) -> Result<(Vec<u8>, Vec<u8>), DomainError> {
        let Some(&first_byte) = key_data.first() else {
            return Err(DomainError::InvalidDnsResponse(
                "Empty RSA public key".into(),
            ));
        };

        let (exp_len, exp_start) = if first_byte == 0 {
            if key_data.len() < 3 {
                return Err(DomainError::InvalidDnsResponse(
                    "RSA key too short for long form".into(),
                ));
            }
            (u16::from_be_bytes([key_data[1], key_data[2]]) as usize, 3)
        } else {
            (first_byte as usize, 1)
        };

        let exp_end = exp_start + exp_len;
        if exp_end > key_data.len() {
            return Err(DomainError::InvalidDnsResponse(
                "RSA exponent extends beyond key data".into(),
            ));
        }

        let exponent = key_data[exp_start..exp_end].to_vec();
        let modulus = key_data[exp_end..].to_vec();

        if modulus.is_empty() {
            return Err(DomainError::InvalidDnsResponse(
                "RSA modulus is empty".into(),
            ));
        }

        Ok((exponent, modulus))
    }

    fn build_dnskey_data(
        &self,
        dnskey: &DnskeyRecord,
        owner_name: &str,
    ) -> Result<Vec<u8>, DomainError> {
        let mut data = self.name_to_wire(owner_name)?;

        data.extend_from_slice(&dnskey.flags.to_be_bytes());
        data.push(dnskey.protocol);
        data.push(dnskey.algorithm);
        data.extend_from_slice(&dnskey.public_key);

        Ok(data)
    }

    /// Canonical (lowercase, uncompressed) wire form of a name.
    fn name_to_wire(&self, name: &str) -> Result<Vec<u8>, DomainError> {
        let mut wire = Vec::new();
        let name = name.trim_end_matches('.');

        if name.is_empty() {
            wire.push(0);
            return Ok(wire);
        }

        for label in name.split('.') {
            if label.is_empty() {
                return Err(DomainError::InvalidDnsResponse("Empty DNS label".into()));
            }

            if label.len() > 63 {
                return Err(DomainError::InvalidDnsResponse("DNS label too long".into()));
            }

            wire.push(label.len() as u8);
            wire.extend_from_slice(label.to_ascii_lowercase().as_bytes());
        }

        wire.push(0);

        Ok(wire)
    }
}
