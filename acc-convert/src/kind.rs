/// Source object types the converter knows how to handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Pool,
    VirtualServer,
    Monitor,
    HttpProfile,
    TcpProfile,
    UdpProfile,
    FastL4Profile,
    OneConnectProfile,
    HttpCompressionProfile,
    ClientSslProfile,
    ServerSslProfile,
    Persistence,
    Rule,
    GslbRule,
    SnatPool,
    DataGroup,
    /// Read by other handlers, never emitted on its own.
    Node,
    /// Read by other handlers, never emitted on its own.
    VirtualAddress,
    GlobalSettings,
    Dns,
    Ntp,
    Vlan,
    SelfIp,
    Route,
    Unmodeled,
}

impl ObjectKind {
    pub fn from_keyword(keyword: &str) -> Self {
        match keyword {
            "ltm pool" => Self::Pool,
            "ltm virtual" => Self::VirtualServer,
            "ltm profile http" => Self::HttpProfile,
            "ltm profile tcp" => Self::TcpProfile,
            "ltm profile udp" => Self::UdpProfile,
            "ltm profile fastl4" => Self::FastL4Profile,
            "ltm profile one-connect" => Self::OneConnectProfile,
            "ltm profile http-compression" => Self::HttpCompressionProfile,
            "ltm profile client-ssl" => Self::ClientSslProfile,
            "ltm profile server-ssl" => Self::ServerSslProfile,
            "ltm rule" => Self::Rule,
            "gtm rule" => Self::GslbRule,
            "ltm snatpool" => Self::SnatPool,
            "ltm data-group internal" => Self::DataGroup,
            "ltm node" => Self::Node,
            "ltm virtual-address" => Self::VirtualAddress,
            "sys global-settings" => Self::GlobalSettings,
            "sys dns" => Self::Dns,
            "sys ntp" => Self::Ntp,
            "net vlan" => Self::Vlan,
            "net self" => Self::SelfIp,
            "net route" => Self::Route,
            other if other.starts_with("ltm monitor ") => Self::Monitor,
            other if other.starts_with("ltm persistence ") => Self::Persistence,
            _ => Self::Unmodeled,
        }
    }

    /// Objects consumed through lookups by other kinds.
    pub fn is_lookup_only(self) -> bool {
        matches!(self, Self::Node | Self::VirtualAddress)
    }

    /// Objects that belong to a device declaration.
    pub fn is_device_level(self) -> bool {
        matches!(
            self,
            Self::GlobalSettings | Self::Dns | Self::Ntp | Self::Vlan | Self::SelfIp | Self::Route
        )
    }

    /// Declaration class for kinds with a fixed one.
    pub fn class(self) -> Option<&'static str> {
        let class = match self {
            Self::Pool => "Pool",
            Self::Monitor => "Monitor",
            Self::HttpProfile => "HTTP_Profile",
            Self::TcpProfile => "TCP_Profile",
            Self::UdpProfile => "UDP_Profile",
            Self::FastL4Profile => "L4_Profile",
            Self::OneConnectProfile => "Multiplex_Profile",
            Self::HttpCompressionProfile => "HTTP_Compress",
            Self::ClientSslProfile => "TLS_Server",
            Self::ServerSslProfile => "TLS_Client",
            Self::Persistence => "Persist",
            Self::Rule => "iRule",
            Self::GslbRule => "GSLB_iRule",
            Self::SnatPool => "SNAT_Pool",
            Self::DataGroup => "Data_Group",
            Self::Dns => "DNS",
            Self::Ntp => "NTP",
            Self::Vlan => "VLAN",
            Self::SelfIp => "SelfIp",
            Self::Route => "Route",
            Self::VirtualServer
            | Self::Node
            | Self::VirtualAddress
            | Self::GlobalSettings
            | Self::Unmodeled => return None,
        };
        Some(class)
    }
}

#[cfg(test)]
mod tests {
    use super::ObjectKind;

    #[test]
    fn keywords_map_to_kinds() {
        assert_eq!(ObjectKind::from_keyword("ltm pool"), ObjectKind::Pool);
        assert_eq!(ObjectKind::from_keyword("ltm monitor https"), ObjectKind::Monitor);
        assert_eq!(
            ObjectKind::from_keyword("ltm persistence cookie"),
            ObjectKind::Persistence
        );
        assert_eq!(ObjectKind::from_keyword("net self"), ObjectKind::SelfIp);
        assert_eq!(
            ObjectKind::from_keyword("analytics gui-widget"),
            ObjectKind::Unmodeled
        );
    }

    #[test]
    fn classes_and_roles() {
        assert_eq!(ObjectKind::ClientSslProfile.class(), Some("TLS_Server"));
        assert_eq!(ObjectKind::ServerSslProfile.class(), Some("TLS_Client"));
        assert_eq!(ObjectKind::VirtualServer.class(), None);
        assert!(ObjectKind::Node.is_lookup_only());
        assert!(ObjectKind::Route.is_device_level());
        assert!(!ObjectKind::Pool.is_device_level());
    }
}
