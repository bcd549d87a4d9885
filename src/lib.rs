#![warn(missing_docs)]
/*! Serial companion for a 6TiSCH/RPL DODAG root mote.

Speaks the mote's HDLC-framed serial protocol: a reader task frames,
decodes and logs whatever the mote sends (status reports, error
notifications, and 6LoWPAN/RPL data), while a commander task tells the
mote to become the DODAG root once, five seconds after the port opens.

# Architecture overview

```text
 [ serial::SerialReader ]
           |
           v
   [ hdlc::Framer ]  -- strips flag delimiters and the flow-escape layer
           |
           v
  [ hdlc::decode() ]  -- undoes HDLC byte-stuffing, checks the CRC,
           |             dispatches on the frame's type byte
           v
  [ reader::dispatch ] -- status/notification frames: log and done
           |              data frames: hand off below
           v
 [ sixlowpan::parse_data_frame ] -- 6LoRH-RPI + IPHC decompression
           |
           v
      [ rpl::read_dao ]  -- DAO -> (child, parent) route -> RouteSink
```

Concurrently, [`commander::run`] owns the write half of the same serial
port and sends exactly one frame, five seconds after startup.
 */

pub mod addr;
pub mod commander;
pub mod config;
pub mod error;
pub mod hdlc;
pub mod logging;
pub mod reader;
pub mod rpl;
pub mod serial;
pub mod sixlowpan;
