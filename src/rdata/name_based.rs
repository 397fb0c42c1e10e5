//! NS/CNAME/PTR: RDATA that is a single domain name.
use std::io::Cursor;

use crate::error::DNSResult;
use crate::name::Name;
use crate::wire::ToFromNetworkOrder;

macro_rules! name_record {
    ($t:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Default)]
        pub struct $t(pub Name);

        impl $t {
            pub(crate) fn from_cursor(buffer: &mut Cursor<&[u8]>) -> DNSResult<Self> {
                let mut name = Name::default();
                name.from_network_bytes(buffer)?;
                Ok($t(name))
            }

            pub fn to_text(&self) -> String {
                self.0.to_string()
            }

            pub fn parse_text(token: &str, origin: &Name) -> DNSResult<Self> {
                Ok($t(Name::from_text_with_origin(token, origin)?))
            }
        }
    };
}

name_record!(Ns);
name_record!(Cname);
name_record!(Ptr);

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn cname_roundtrip() {
        let c = Cname(Name::from_str("target.example.com.").unwrap());
        let mut buf = Vec::new();
        c.0.to_network_bytes(&mut buf).unwrap();
        let mut cur = Cursor::new(buf.as_slice());
        assert_eq!(Cname::from_cursor(&mut cur).unwrap(), c);
    }

    #[test]
    fn ns_text_roundtrip_relative() {
        let origin = Name::from_str("example.com.").unwrap();
        let ns = Ns::parse_text("ns1", &origin).unwrap();
        assert_eq!(ns.to_text(), "ns1.example.com.");
    }
}
