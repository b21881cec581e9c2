/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Typed records for the keyed setup sections
//!
//! Each record knows the keys it accepts, keys are stored without
//! their section prefix, i.e `SP_SCAN_X` is looked up as `SCAN_X`.

use alloc::string::String;

/// A value type that can appear on the right of a setup token
pub trait SetupValue: Sized {
    fn parse_value(value: &str) -> Option<Self>;
}

impl SetupValue for i32 {
    fn parse_value(value: &str) -> Option<Self> {
        value.trim().parse().ok()
    }
}

impl SetupValue for f32 {
    fn parse_value(value: &str) -> Option<Self> {
        value.trim().parse().ok()
    }
}

impl SetupValue for bool {
    fn parse_value(value: &str) -> Option<Self> {
        let value = value.trim();

        if ["1", "Y", "YES", "TRUE"]
            .iter()
            .any(|x| value.eq_ignore_ascii_case(x))
        {
            Some(true)
        } else if ["0", "N", "NO", "FALSE"]
            .iter()
            .any(|x| value.eq_ignore_ascii_case(x))
        {
            Some(false)
        } else {
            None
        }
    }
}

impl SetupValue for String {
    fn parse_value(value: &str) -> Option<Self> {
        Some(value.trim().into())
    }
}

/// Outcome of storing one token into a record
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Assign {
    Stored,
    /// The record has no field for this key
    UnknownKey,
    /// The key is known but the value doesn't parse as the field type
    BadValue
}

macro_rules! setup_record {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($(#[$field_meta:meta])* $field:ident: $ty:ty => $key:literal),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Default, Clone, PartialEq)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize))]
        pub struct $name {
            $($(#[$field_meta])* pub $field: $ty),*
        }

        impl $name {
            /// Every key this record accepts
            pub const KEYS: &'static [&'static str] = &[$($key),*];

            /// Store `value` into the field named by `key`
            pub fn set(&mut self, key: &str, value: &str) -> Assign {
                match key {
                    $($key => match <$ty as SetupValue>::parse_value(value) {
                        Some(parsed) => {
                            self.$field = parsed;
                            Assign::Stored
                        }
                        None => Assign::BadValue
                    },)*
                    _ => Assign::UnknownKey
                }
            }
        }
    };
}

setup_record! {
    /// Printer and plot output settings, `#PR` lines
    PrintSettings {
        device_nr: i32 => "DEVICE_NR",
        device_name: String => "DEVICE_NAME",
        plot_func_nr: i32 => "PLOT_FUNC_NR",
        plot_func_name: String => "PLOT_FUNC_NAME",
        width: i32 => "WIDTH",
        height: i32 => "HEIGHT",
        curve_width: f32 => "CURVE_WIDTH",
        axis_width: f32 => "AXIS_WIDTH",
        print_dialog: bool => "PRINT_DIALOG",
        print_to_file: bool => "PRINT_TO_FILE",
        file_name: String => "FILE_NAME",
        print_win: bool => "PRINT_WIN",
        print_title: bool => "PRINT_TITLE",
        print_info: bool => "PRINT_INFO",
        color: bool => "COLOR"
    }
}

setup_record! {
    /// Acquisition electronics settings, `#SP` lines
    ///
    /// `scan_*`, `adc_re` and `img_*` feed the dimension resolver.
    SystemParameters {
        mode: i32 => "MODE",
        cfd_ll: f32 => "CFD_LL",
        cfd_lh: f32 => "CFD_LH",
        cfd_zc: f32 => "CFD_ZC",
        cfd_hf: f32 => "CFD_HF",
        syn_zc: f32 => "SYN_ZC",
        syn_fd: i32 => "SYN_FD",
        syn_fq: f32 => "SYN_FQ",
        syn_hf: f32 => "SYN_HF",
        syn_th: f32 => "SYN_TH",
        tac_r: f32 => "TAC_R",
        tac_g: i32 => "TAC_G",
        tac_of: f32 => "TAC_OF",
        tac_ll: f32 => "TAC_LL",
        tac_lh: f32 => "TAC_LH",
        adc_re: i32 => "ADC_RE",
        adc_zoom: i32 => "ADC_ZOOM",
        eal_de: i32 => "EAL_DE",
        ncx: i32 => "NCX",
        page: i32 => "PAGE",
        col_t: f32 => "COL_T",
        rep_t: f32 => "REP_T",
        stopt: bool => "STOPT",
        overfl: String => "OVERFL",
        use_motor: bool => "USE_MOTOR",
        steps: i32 => "STEPS",
        offset: f32 => "OFFSET",
        dither: i32 => "DITHER",
        incr: i32 => "INCR",
        mem_bank: i32 => "MEM_BANK",
        mod_type: String => "MOD_TYPE",
        mod_ser_no: String => "MOD_SER_NO",
        mod_type_code: i32 => "MOD_TYPE_CODE",
        mod_fpga_ver: i32 => "MOD_FPGA_VER",
        dead_time_comp: bool => "DEAD_TIME_COMP",
        polarity_l: i32 => "POL_L",
        polarity_f: i32 => "POL_F",
        polarity_p: i32 => "POL_P",
        linediv: i32 => "LINE_DIV",
        accumulate: bool => "ACCUMULATE",
        flbck_y: i32 => "FLBCK_Y",
        flbck_x: i32 => "FLBCK_X",
        bord_u: i32 => "BORD_U",
        bord_l: i32 => "BORD_L",
        pix_time: f32 => "PIX_TIME",
        pix_clk: i32 => "PIX_CLK",
        trigger: i32 => "TRIGGER",
        ext_pixclk_div: i32 => "EXT_PIXCLK_DIV",
        scan_x: i32 => "SCAN_X",
        scan_y: i32 => "SCAN_Y",
        scan_rx: i32 => "SCAN_RX",
        scan_ry: i32 => "SCAN_RY",
        scan_flags: i32 => "SCAN_FLAGS",
        img_x: i32 => "IMG_X",
        img_y: i32 => "IMG_Y",
        img_rx: i32 => "IMG_RX",
        img_ry: i32 => "IMG_RY",
        xy_gain: i32 => "XY_GAIN",
        master_clock: i32 => "MST_CLK",
        adc_de: i32 => "ADC_DE",
        det_type: i32 => "DET_TYPE",
        x_axis: i32 => "X_AXIS",
        fifo_typ: i32 => "FIFO_TYP",
        epx_div: i32 => "EPX_DIV",
        overflow_corr_factor: f32 => "OVERFLOW_CORR_FACTOR",
        cycles: i32 => "CYCLES",
        stop_on_time: bool => "STOP_ON_TIME",
        stop_on_ovfl: bool => "STOP_ON_OVFL",
        routing_chan_x: i32 => "RTC_X",
        routing_chan_y: i32 => "RTC_Y",
        chan_slope: i32 => "CHAN_SLOPE",
        chan_spec_no: i32 => "CHAN_SPEC_NO",
        tdc_offset_1: f32 => "TDC_OFFSET1",
        tdc_offset_2: f32 => "TDC_OFFSET2",
        tdc_offset_3: f32 => "TDC_OFFSET3",
        tdc_offset_4: f32 => "TDC_OFFSET4",
        tdc_control: i32 => "TDC_CONTROL",
        macro_time_clock: i32 => "MACRO_TIME_CLK",
        add_select: i32 => "ADD_SELECT",
        test_eep: bool => "TEST_EEP",
        adc_sample_delay: i32 => "ADC_SAMPLE_DELAY",
        detector_type: i32 => "DETECTOR_TYPE",
        chan_enable: i32 => "CHAN_ENABLE",
        x_axis_type: i32 => "X_AXIS_TYPE",
        sync_threshold: f32 => "SYNC_THRESHOLD",
        display_cycle: f32 => "DISP_CYCLE",
        repeat_time: f32 => "REPEAT_TIME"
    }
}

setup_record! {
    /// Display settings, `#DI` lines
    DisplayParameters {
        simple: bool => "SIMPLE",
        speed: bool => "SPEED",
        maxcnt: i32 => "MAXCNT",
        three_d: bool => "3D",
        page: i32 => "PAGE",
        time: i32 => "TIME",
        st: i32 => "ST",
        curve: i32 => "CURVE",
        curves: i32 => "CURVES",
        color: i32 => "COLOR",
        from_x: f32 => "FROM_X",
        to_x: f32 => "TO_X",
        from_y: f32 => "FROM_Y",
        to_y: f32 => "TO_Y",
        from_z: f32 => "FROM_Z",
        to_z: f32 => "TO_Z",
        grid: i32 => "GRID",
        grid_color: i32 => "GR_COLOR",
        solid: bool => "SOLID",
        display_type: i32 => "TYPE",
        zoom: f32 => "ZOOM",
        mode: i32 => "MODE",
        ch_page: i32 => "CH_PAGE",
        log_y: bool => "LOG_Y",
        log_z: bool => "LOG_Z",
        baseline: f32 => "BASELINE",
        top_mode: i32 => "TOP_MODE",
        top_val: i32 => "TOP_VAL",
        bot_mode: i32 => "BOT_MODE",
        bot_val: i32 => "BOT_VAL",
        lin_3d: bool => "LIN_3D",
        reverse: bool => "REVERSE",
        scale: i32 => "SCALE",
        scale_x: i32 => "SCALE_X",
        scale_y: i32 => "SCALE_Y",
        rotate: i32 => "ROTATE",
        persp: f32 => "PERSP",
        elevation: f32 => "ELEVATION",
        azimuth: f32 => "AZIMUTH",
        hidden: bool => "HIDDEN",
        trace: bool => "TRACE",
        trace_mode: i32 => "TRACE_MODE",
        trace_count: i32 => "TRACE_COUNT",
        cursor: bool => "CURSOR",
        cursor_x: f32 => "CURSOR_X",
        cursor_y: f32 => "CURSOR_Y"
    }
}
