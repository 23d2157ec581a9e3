use crate::bail;
use crate::io::{DNSReadExt, SeekExt};
use crate::types::*;
use byteorder::ReadBytesExt;
use log::trace;
use num_traits::FromPrimitive;
use std::io;
use std::io::Cursor;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::time::Duration;

// A helper class to hold state while the parsing is happening.
pub(crate) struct MessageParser<'a> {
    cur: Cursor<&'a [u8]>,

    m: Message,
}

#[derive(Copy, Clone, PartialEq)]
enum RecordSection {
    Answers,
    Authorities,
    Additionals,
}

impl<'a> MessageParser<'a> {
    fn new(buf: &[u8]) -> MessageParser {
        MessageParser {
            cur: Cursor::new(buf),
            m: Message::default(),
        }
    }

    /// Consume the MessageParser and returned the resulting Message.
    fn parse(mut self) -> io::Result<Message> {
        self.m.id = self.cur.read_u16be()?;

        let b = self.cur.read_u8()?;
        self.m.qr = QR::from_bool(0b1000_0000 & b != 0);
        let opcode = (0b0111_1000 & b) >> 3;
        self.m.aa = (0b0000_0100 & b) != 0;
        self.m.tc = (0b0000_0010 & b) != 0;
        self.m.rd = (0b0000_0001 & b) != 0;

        self.m.opcode = match FromPrimitive::from_u8(opcode) {
            Some(t) => t,
            None => bail!(InvalidData, "invalid Opcode({})", opcode),
        };

        let b = self.cur.read_u8()?;
        self.m.ra = (0b1000_0000 & b) != 0;
        self.m.rcode = Rcode::from_u8(b);

        let qd_count = self.cur.read_u16be()?;
        let an_count = self.cur.read_u16be()?;
        let ns_count = self.cur.read_u16be()?;
        let ar_count = self.cur.read_u16be()?;

        self.read_questions(qd_count)?;
        self.read_records(an_count, RecordSection::Answers)?;
        self.read_records(ns_count, RecordSection::Authorities)?;
        self.read_records(ar_count, RecordSection::Additionals)?;

        if self.cur.remaining()? > 0 {
            bail!(
                InvalidData,
                "finished parsing with {} bytes left over",
                self.cur.remaining()?
            );
        }

        Ok(self.m)
    }

    fn read_questions(&mut self, count: u16) -> io::Result<()> {
        for _ in 0..count {
            let name = self.cur.read_qname()?;
            let r#type = self.cur.read_u16be()?;
            let class = self.cur.read_u16be()?;

            let r#type = match FromPrimitive::from_u16(r#type) {
                Some(t) => t,
                None => bail!(InvalidData, "invalid Type({})", r#type),
            };
            let class = match FromPrimitive::from_u16(class) {
                Some(c) => c,
                None => bail!(InvalidData, "invalid Class({})", class),
            };

            self.m.questions.push(Question {
                name,
                r#type,
                class,
            });
        }

        Ok(())
    }

    fn read_records(&mut self, count: u16, section: RecordSection) -> io::Result<()> {
        for _ in 0..count {
            let name = self.cur.read_qname()?;
            let r#type = self.cur.read_u16be()?;
            let class = self.cur.read_u16be()?;
            let ttl = self.cur.read_u32be()?;
            let len = self.cur.read_u16be()? as u64;

            if self.cur.remaining()? < len {
                bail!(
                    UnexpectedEof,
                    "record '{}' claims {} bytes of data, only {} remain",
                    name,
                    len,
                    self.cur.remaining()?
                );
            }

            let start = self.cur.position();
            let end = start + len;

            // The class field of a OPT record holds the payload size, so it
            // must be caught before the class is interpreted.
            let r#type: Type = match FromPrimitive::from_u16(r#type) {
                Some(Type::OPT) | None => {
                    trace!("skipping record '{}' of type {}", name, r#type);
                    self.cur.set_position(end);
                    continue;
                }
                Some(t) => t,
            };

            let class = match FromPrimitive::from_u16(class) {
                Some(c) => c,
                None => {
                    trace!("skipping record '{}' of class {}", name, class);
                    self.cur.set_position(end);
                    continue;
                }
            };

            let resource = self.read_resource(r#type, len as usize)?;

            if self.cur.position() != end {
                bail!(
                    InvalidData,
                    "record '{}' data was {} bytes, expected {}",
                    name,
                    self.cur.position() - start,
                    len
                );
            }

            let record = Record {
                name,
                r#type,
                class,
                ttl: Duration::from_secs(ttl.into()),
                resource,
            };

            match section {
                RecordSection::Answers => self.m.answers.push(record),
                RecordSection::Authorities => self.m.authoritys.push(record),
                RecordSection::Additionals => self.m.additionals.push(record),
            }
        }

        Ok(())
    }

    fn read_resource(&mut self, r#type: Type, len: usize) -> io::Result<Resource> {
        Ok(match r#type {
            Type::A => {
                if len != 4 {
                    bail!(InvalidData, "invalid A record length ({}) expected 4", len);
                }
                let mut octets = [0; 4];
                io::Read::read_exact(&mut self.cur, &mut octets)?;
                Resource::A(Ipv4Addr::from(octets))
            }

            Type::AAAA => {
                if len != 16 {
                    bail!(InvalidData, "invalid AAAA record length ({}) expected 16", len);
                }
                let mut octets = [0; 16];
                io::Read::read_exact(&mut self.cur, &mut octets)?;
                Resource::AAAA(Ipv6Addr::from(octets))
            }

            // Names may be compressed against anything earlier in the
            // message, so they are read from the message cursor.
            Type::NS => Resource::NS(self.cur.read_qname()?),
            Type::CNAME => Resource::CNAME(self.cur.read_qname()?),
            Type::PTR => Resource::PTR(self.cur.read_qname()?),

            _ => {
                let mut data = vec![0; len];
                io::Read::read_exact(&mut self.cur, &mut data)?;
                Resource::Opaque(r#type, data)
            }
        })
    }
}

impl Message {
    pub fn from_slice(buf: &[u8]) -> io::Result<Message> {
        MessageParser::new(buf).parse()
    }

    /// Adds a question for `domain`, making it fully qualified if needed.
    pub fn add_question(&mut self, domain: &str, r#type: Type, class: Class) {
        let mut name = domain.to_string();
        if !name.ends_with('.') {
            name.push('.');
        }

        self.questions.push(Question {
            name,
            r#type,
            class,
        });
    }

    /// Returns this DNS Message as a Vec<u8> ready to be sent, as defined by [rfc1035](https://datatracker.ietf.org/doc/html/rfc1035).
    ///
    /// Only queries can be encoded, any records in the message are an error.
    pub fn to_vec(&self) -> io::Result<Vec<u8>> {
        if !self.answers.is_empty() || !self.authoritys.is_empty() || !self.additionals.is_empty()
        {
            bail!(InvalidInput, "encoding resource records is not supported");
        }

        let mut req = Vec::<u8>::with_capacity(512);

        req.extend_from_slice(&self.id.to_be_bytes());

        let mut b = 0_u8;
        b |= if self.qr.to_bool() { 0b1000_0000 } else { 0 };
        b |= ((self.opcode as u8) << 3) & 0b0111_1000;
        b |= if self.aa { 0b0000_0100 } else { 0 };
        b |= if self.tc { 0b0000_0010 } else { 0 };
        b |= if self.rd { 0b0000_0001 } else { 0 };
        req.push(b);

        let mut b = 0_u8;
        b |= if self.ra { 0b1000_0000 } else { 0 };
        b |= self.rcode.to_u8();
        req.push(b);

        req.extend_from_slice(&(self.questions.len() as u16).to_be_bytes());
        req.extend_from_slice(&0_u16.to_be_bytes()); // ANCOUNT
        req.extend_from_slice(&0_u16.to_be_bytes()); // NSCOUNT
        req.extend_from_slice(&0_u16.to_be_bytes()); // ARCOUNT

        for question in &self.questions {
            Message::write_qname(&mut req, &question.name)?;

            req.extend_from_slice(&(question.r#type as u16).to_be_bytes());
            req.extend_from_slice(&(question.class as u16).to_be_bytes());
        }

        Ok(req)
    }

    /// Writes a ASCII domain name into the supplied `Vec<u8>`, uncompressed.
    fn write_qname(buf: &mut Vec<u8>, domain: &str) -> io::Result<()> {
        if !domain.is_ascii() {
            bail!(InvalidData, "invalid dns name '{0}': not ascii", domain);
        }

        if !domain.is_empty() && domain != "." {
            for label in domain.split_terminator('.') {
                if label.is_empty() {
                    bail!(InvalidData, "empty label in domain name '{}'", domain);
                }

                if label.len() > 63 {
                    bail!(InvalidData, "label '{0}' longer than 63 characters", label);
                }

                buf.push(label.len() as u8);
                buf.extend_from_slice(label.as_bytes());
            }
        }

        buf.push(0);

        Ok(())
    }
}
