//! IPv4 protocol counters: sockets, IP, TCP and UDP.

use std::io::{self, Write};

use super::{Pass, emit};
use crate::rate::per_second;
use crate::render::{Field, FieldRenderer};
use crate::sample::Sample;

/// Sockets in use. These are gauges taken from the current sample.
pub(super) fn render_net_sock<W: Write>(
    r: &mut FieldRenderer<W>,
    pass: &Pass<'_>,
    current: &mut Sample,
) -> io::Result<()> {
    let Some(s) = current.net_sock else {
        return Ok(());
    };
    emit(
        r,
        pass.prefix,
        &[
            Field::int("-\ttotsck", s.sock_inuse),
            Field::int("-\ttcpsck", s.tcp_inuse),
            Field::int("-\tudpsck", s.udp_inuse),
            Field::int("-\trawsck", s.raw_inuse),
            Field::int("-\tip-frag", s.frag_inuse),
            Field::int("-\ttcp-tw", s.tcp_tw),
        ],
    )
}

pub(super) fn render_net_ip<W: Write>(
    r: &mut FieldRenderer<W>,
    pass: &Pass<'_>,
    current: &mut Sample,
) -> io::Result<()> {
    let (Some(prev), Some(curr)) = (pass.previous.net_ip, current.net_ip) else {
        return Ok(());
    };
    let iv = pass.intervals;
    let rate = |p: u64, c: u64| per_second(p, c, iv.itv, iv.hz);
    emit(
        r,
        pass.prefix,
        &[
            Field::rate("-\tirec/s", rate(prev.in_receives, curr.in_receives)),
            Field::rate("-\tfwddgm/s", rate(prev.forw_datagrams, curr.forw_datagrams)),
            Field::rate("-\tidel/s", rate(prev.in_delivers, curr.in_delivers)),
            Field::rate("-\torq/s", rate(prev.out_requests, curr.out_requests)),
            Field::rate("-\tasmrq/s", rate(prev.reasm_reqds, curr.reasm_reqds)),
            Field::rate("-\tasmok/s", rate(prev.reasm_oks, curr.reasm_oks)),
            Field::rate("-\tfragok/s", rate(prev.frag_oks, curr.frag_oks)),
            Field::rate("-\tfragcrt/s", rate(prev.frag_creates, curr.frag_creates)),
        ],
    )
}

pub(super) fn render_net_tcp<W: Write>(
    r: &mut FieldRenderer<W>,
    pass: &Pass<'_>,
    current: &mut Sample,
) -> io::Result<()> {
    let (Some(prev), Some(curr)) = (pass.previous.net_tcp, current.net_tcp) else {
        return Ok(());
    };
    let iv = pass.intervals;
    let rate = |p: u64, c: u64| per_second(p, c, iv.itv, iv.hz);
    emit(
        r,
        pass.prefix,
        &[
            Field::rate("-\tactive/s", rate(prev.active_opens, curr.active_opens)),
            Field::rate("-\tpassive/s", rate(prev.passive_opens, curr.passive_opens)),
            Field::rate("-\tiseg/s", rate(prev.in_segs, curr.in_segs)),
            Field::rate("-\toseg/s", rate(prev.out_segs, curr.out_segs)),
        ],
    )
}

pub(super) fn render_net_udp<W: Write>(
    r: &mut FieldRenderer<W>,
    pass: &Pass<'_>,
    current: &mut Sample,
) -> io::Result<()> {
    let (Some(prev), Some(curr)) = (pass.previous.net_udp, current.net_udp) else {
        return Ok(());
    };
    let iv = pass.intervals;
    let rate = |p: u64, c: u64| per_second(p, c, iv.itv, iv.hz);
    emit(
        r,
        pass.prefix,
        &[
            Field::rate("-\tidgm/s", rate(prev.in_datagrams, curr.in_datagrams)),
            Field::rate("-\todgm/s", rate(prev.out_datagrams, curr.out_datagrams)),
            Field::rate("-\tnoport/s", rate(prev.no_ports, curr.no_ports)),
            Field::rate("-\tidgmerr/s", rate(prev.in_errors, curr.in_errors)),
        ],
    )
}
