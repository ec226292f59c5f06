use pnet::packet::ethernet::{EtherTypes, EthernetPacket};
use pnet::packet::ip::IpNextHeaderProtocols;
use pnet::packet::ipv4::Ipv4Packet;
use pnet::packet::ipv6::Ipv6Packet;
use pnet::packet::tcp::TcpPacket;
use pnet::packet::udp::UdpPacket;
use pnet::packet::Packet;

/// One decoded frame from the capture file. The tallying pass reads these and
/// never touches raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PacketRecord {
    pub protocol: String,
    pub src_ip: Option<String>,
    pub dst_ip: Option<String>,
    pub src_port: Option<u16>,
    pub dst_port: Option<u16>,
    pub length: usize,
}

impl PacketRecord {
    /// A frame carries an IP layer exactly when a source address was decoded.
    pub fn has_ip_layer(&self) -> bool {
        self.src_ip.is_some()
    }

    fn without_network_layer(protocol: String, length: usize) -> Self {
        PacketRecord {
            protocol,
            src_ip: None,
            dst_ip: None,
            src_port: None,
            dst_port: None,
            length,
        }
    }
}

/// Decode a raw Ethernet frame into a `PacketRecord`.
///
/// The protocol label is the most specific layer identified: transport
/// protocols are refined to an application label by well-known port where
/// possible. Truncated or unrecognized frames yield "Unknown" rather than an
/// error; the record still counts toward the totals.
pub fn decode_frame(data: &[u8]) -> PacketRecord {
    let length = data.len();

    let ethernet = match EthernetPacket::new(data) {
        Some(packet) => packet,
        None => return PacketRecord::without_network_layer("Unknown".to_string(), length),
    };

    match ethernet.get_ethertype() {
        EtherTypes::Ipv4 => {
            if let Some(ipv4) = Ipv4Packet::new(ethernet.payload()) {
                return decode_transport(
                    ipv4.get_next_level_protocol(),
                    ipv4.payload(),
                    ipv4.get_source().to_string(),
                    ipv4.get_destination().to_string(),
                    length,
                );
            }
            PacketRecord::without_network_layer("Unknown".to_string(), length)
        }
        EtherTypes::Ipv6 => {
            if let Some(ipv6) = Ipv6Packet::new(ethernet.payload()) {
                return decode_transport(
                    ipv6.get_next_header(),
                    ipv6.payload(),
                    ipv6.get_source().to_string(),
                    ipv6.get_destination().to_string(),
                    length,
                );
            }
            PacketRecord::without_network_layer("Unknown".to_string(), length)
        }
        EtherTypes::Arp => PacketRecord::without_network_layer("ARP".to_string(), length),
        other => {
            PacketRecord::without_network_layer(format!("Ethernet-{:?}", other), length)
        }
    }
}

fn decode_transport(
    protocol: pnet::packet::ip::IpNextHeaderProtocol,
    payload: &[u8],
    src_ip: String,
    dst_ip: String,
    length: usize,
) -> PacketRecord {
    match protocol {
        IpNextHeaderProtocols::Tcp => {
            if let Some(tcp) = TcpPacket::new(payload) {
                let src_port = tcp.get_source();
                let dst_port = tcp.get_destination();
                return PacketRecord {
                    protocol: application_label("TCP", src_port, dst_port),
                    src_ip: Some(src_ip),
                    dst_ip: Some(dst_ip),
                    src_port: Some(src_port),
                    dst_port: Some(dst_port),
                    length,
                };
            }
            ip_only_record("TCP".to_string(), src_ip, dst_ip, length)
        }
        IpNextHeaderProtocols::Udp => {
            if let Some(udp) = UdpPacket::new(payload) {
                let src_port = udp.get_source();
                let dst_port = udp.get_destination();
                return PacketRecord {
                    protocol: application_label("UDP", src_port, dst_port),
                    src_ip: Some(src_ip),
                    dst_ip: Some(dst_ip),
                    src_port: Some(src_port),
                    dst_port: Some(dst_port),
                    length,
                };
            }
            ip_only_record("UDP".to_string(), src_ip, dst_ip, length)
        }
        IpNextHeaderProtocols::Icmp => ip_only_record("ICMP".to_string(), src_ip, dst_ip, length),
        IpNextHeaderProtocols::Icmpv6 => {
            ip_only_record("ICMPv6".to_string(), src_ip, dst_ip, length)
        }
        other => ip_only_record(format!("IP-{}", other), src_ip, dst_ip, length),
    }
}

fn ip_only_record(protocol: String, src_ip: String, dst_ip: String, length: usize) -> PacketRecord {
    PacketRecord {
        protocol,
        src_ip: Some(src_ip),
        dst_ip: Some(dst_ip),
        src_port: None,
        dst_port: None,
        length,
    }
}

/// Refine a transport label to an application label by well-known port.
/// Destination port wins over source port when both match.
fn application_label(transport: &str, src_port: u16, dst_port: u16) -> String {
    for port in [dst_port, src_port] {
        let label = match (transport, port) {
            (_, 53) => Some("DNS"),
            ("TCP", 22) => Some("SSH"),
            ("TCP", 80) => Some("HTTP"),
            ("TCP", 443) => Some("HTTPS"),
            ("UDP", 67) | ("UDP", 68) => Some("DHCP"),
            ("UDP", 123) => Some("NTP"),
            ("UDP", 5353) => Some("MDNS"),
            _ => None,
        };
        if let Some(label) = label {
            return label.to_string();
        }
    }
    transport.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ethernet_frame(ethertype: u16, payload: &[u8]) -> Vec<u8> {
        let mut frame = vec![0u8; 12]; // dst + src MAC
        frame.extend_from_slice(&ethertype.to_be_bytes());
        frame.extend_from_slice(payload);
        frame
    }

    fn ipv4_packet(src: [u8; 4], dst: [u8; 4], protocol: u8, payload: &[u8]) -> Vec<u8> {
        let total_len = (20 + payload.len()) as u16;
        let mut packet = vec![0u8; 20];
        packet[0] = 0x45; // version 4, IHL 5
        packet[2..4].copy_from_slice(&total_len.to_be_bytes());
        packet[8] = 64; // TTL
        packet[9] = protocol;
        packet[12..16].copy_from_slice(&src);
        packet[16..20].copy_from_slice(&dst);
        packet.extend_from_slice(payload);
        packet
    }

    fn udp_datagram(src_port: u16, dst_port: u16) -> Vec<u8> {
        let mut datagram = Vec::new();
        datagram.extend_from_slice(&src_port.to_be_bytes());
        datagram.extend_from_slice(&dst_port.to_be_bytes());
        datagram.extend_from_slice(&8u16.to_be_bytes()); // length
        datagram.extend_from_slice(&[0, 0]); // checksum
        datagram
    }

    fn tcp_segment(src_port: u16, dst_port: u16) -> Vec<u8> {
        let mut segment = vec![0u8; 20];
        segment[0..2].copy_from_slice(&src_port.to_be_bytes());
        segment[2..4].copy_from_slice(&dst_port.to_be_bytes());
        segment[12] = 0x50; // data offset 5
        segment
    }

    #[test]
    fn arp_frame_has_no_ip_layer() {
        let frame = ethernet_frame(0x0806, &[0u8; 28]);
        let record = decode_frame(&frame);
        assert_eq!(record.protocol, "ARP");
        assert!(!record.has_ip_layer());
        assert_eq!(record.length, frame.len());
    }

    #[test]
    fn udp_port_53_is_labeled_dns() {
        let udp = udp_datagram(5555, 53);
        let ipv4 = ipv4_packet([10, 0, 0, 1], [8, 8, 8, 8], 17, &udp);
        let frame = ethernet_frame(0x0800, &ipv4);

        let record = decode_frame(&frame);
        assert_eq!(record.protocol, "DNS");
        assert_eq!(record.src_ip.as_deref(), Some("10.0.0.1"));
        assert_eq!(record.dst_ip.as_deref(), Some("8.8.8.8"));
        assert_eq!(record.src_port, Some(5555));
        assert_eq!(record.dst_port, Some(53));
    }

    #[test]
    fn tcp_port_80_is_labeled_http() {
        let tcp = tcp_segment(49152, 80);
        let ipv4 = ipv4_packet([192, 168, 1, 5], [93, 184, 216, 34], 6, &tcp);
        let frame = ethernet_frame(0x0800, &ipv4);

        let record = decode_frame(&frame);
        assert_eq!(record.protocol, "HTTP");
        assert_eq!(record.src_ip.as_deref(), Some("192.168.1.5"));
    }

    #[test]
    fn tcp_without_known_port_keeps_transport_label() {
        let tcp = tcp_segment(49152, 9999);
        let ipv4 = ipv4_packet([10, 0, 0, 2], [10, 0, 0, 3], 6, &tcp);
        let frame = ethernet_frame(0x0800, &ipv4);

        assert_eq!(decode_frame(&frame).protocol, "TCP");
    }

    #[test]
    fn icmp_is_labeled_without_ports() {
        let ipv4 = ipv4_packet([10, 0, 0, 1], [10, 0, 0, 2], 1, &[8, 0, 0, 0]);
        let frame = ethernet_frame(0x0800, &ipv4);

        let record = decode_frame(&frame);
        assert_eq!(record.protocol, "ICMP");
        assert!(record.has_ip_layer());
        assert_eq!(record.src_port, None);
    }

    #[test]
    fn truncated_frame_is_unknown_not_an_error() {
        let record = decode_frame(&[0u8; 6]);
        assert_eq!(record.protocol, "Unknown");
        assert!(!record.has_ip_layer());
        assert_eq!(record.length, 6);
    }
}
