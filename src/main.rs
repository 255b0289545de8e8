#![no_std]
#![no_main]

use defmt_rtt as _;
use panic_probe as _;

#[rtic::app(device = rp_pico::hal::pac, peripherals = true)]
mod app {
    use embedded_hal::spi::MODE_0;
    use rp_pico::hal::{
        clocks::{init_clocks_and_plls, Clock},
        fugit::{ExtU32, MicrosDurationU32, RateExtU32},
        gpio::{
            bank0::{Gpio16, Gpio17, Gpio18, Gpio19, Gpio20, Gpio21},
            DynPinId, FunctionSio, FunctionSpi, Pin, PullDown, PullUp, SioInput, SioOutput,
        },
        sio::Sio,
        spi::Spi,
        timer::{Alarm, Alarm0, Timer},
        watchdog::Watchdog,
    };
    use rtic::Mutex as _;
    use whac_a_mole::pcd8544::Pcd8544;
    use whac_a_mole::render::SLOT_ANCHORS;
    use whac_a_mole::{
        Buttons, Game, GameConfig, Lcd, Session, Surface, TickConfig, TickOutcome, SLOTS,
    };

    type Spi0 = Spi<
        rp_pico::hal::spi::Enabled,
        rp_pico::hal::pac::SPI0,
        (
            Pin<Gpio19, FunctionSpi, PullDown>,
            Pin<Gpio16, FunctionSpi, PullDown>,
            Pin<Gpio18, FunctionSpi, PullDown>,
        ),
    >;
    type OutPin<I> = Pin<I, FunctionSio<SioOutput>, PullDown>;
    type Nokia = Pcd8544<Spi0, OutPin<Gpio20>, OutPin<Gpio17>, OutPin<Gpio21>>;
    type ButtonPin = Pin<DynPinId, FunctionSio<SioInput>, PullUp>;
    type Board = Game<Lcd<Nokia>, ButtonPin, SLOTS>;

    const CONFIG: GameConfig = GameConfig::CANONICAL;

    /// The 1 Hz alarm. Re-armed from the interrupt until the round ends.
    pub struct Ticker {
        alarm: Alarm0,
        period: MicrosDurationU32,
    }

    impl Ticker {
        fn arm(&mut self) {
            self.alarm.schedule(self.period).ok();
            self.alarm.enable_interrupt();
        }

        fn stop(&mut self) {
            self.alarm.disable_interrupt();
        }
    }

    #[shared]
    struct Shared {
        session: Session,
        ticker: Ticker,
    }

    #[local]
    struct Local {
        game: Board,
        timer: Timer,
    }

    #[init]
    fn init(ctx: init::Context) -> (Shared, Local, init::Monotonics) {
        let mut pac = ctx.device;
        let core = ctx.core;
        let mut watchdog = Watchdog::new(pac.WATCHDOG);
        let sio = Sio::new(pac.SIO);

        let external_xtal_freq_hz = 12_000_000u32;
        let clocks = init_clocks_and_plls(
            external_xtal_freq_hz,
            pac.XOSC,
            pac.CLOCKS,
            pac.PLL_SYS,
            pac.PLL_USB,
            &mut pac.RESETS,
            &mut watchdog,
        )
        .ok()
        .unwrap();

        // Armed only once the round is seeded.
        let mut timer = Timer::new(pac.TIMER, &mut pac.RESETS, &clocks);
        let alarm = timer.alarm_0().unwrap();
        let period = TickConfig::RP2040_TIMER.compare_value().unwrap().micros();

        let pins = rp_pico::Pins::new(
            pac.IO_BANK0,
            pac.PADS_BANK0,
            sio.gpio_bank0,
            &mut pac.RESETS,
        );

        // Slot order: top, left, centre, right, bottom. GP10 doubles as start.
        let buttons = Buttons::new([
            pins.gpio10.into_pull_up_input().into_dyn_pin(),
            pins.gpio11.into_pull_up_input().into_dyn_pin(),
            pins.gpio12.into_pull_up_input().into_dyn_pin(),
            pins.gpio13.into_pull_up_input().into_dyn_pin(),
            pins.gpio14.into_pull_up_input().into_dyn_pin(),
        ]);

        let mosi = pins.gpio19.into_function::<FunctionSpi>();
        let sck = pins.gpio18.into_function::<FunctionSpi>();
        let miso = pins.gpio16.into_function::<FunctionSpi>();
        let ce = pins.gpio17.into_push_pull_output();
        let dc = pins.gpio20.into_push_pull_output();
        let rst = pins.gpio21.into_push_pull_output();

        let spi = Spi::<_, _, _, 8>::new(pac.SPI0, (mosi, miso, sck));
        let spi = spi.init(
            &mut pac.RESETS,
            clocks.peripheral_clock.freq(),
            2_000_000u32.Hz(),
            &MODE_0,
        );

        let mut delay = cortex_m::delay::Delay::new(core.SYST, clocks.system_clock.freq().to_Hz());
        let mut panel = Pcd8544::new(spi, dc, ce, rst);
        panel.init(&mut delay).unwrap();

        let mut lcd = Lcd::new(panel);
        lcd.power(true).unwrap();
        lcd.clear();
        lcd.render().unwrap();

        let game = Game::new(lcd, buttons, CONFIG, SLOT_ANCHORS).unwrap();
        defmt::info!("booted: {}", CONFIG);

        (
            Shared {
                session: Session::new(&CONFIG),
                ticker: Ticker { alarm, period },
            },
            Local { game, timer },
            init::Monotonics(),
        )
    }

    // Foreground: the whole round runs here, then the game-over frame stays up.
    #[idle(shared = [session, ticker], local = [game, timer])]
    fn idle(ctx: idle::Context) -> ! {
        let idle::SharedResources {
            mut session,
            mut ticker,
            ..
        } = ctx.shared;
        let timer: &Timer = ctx.local.timer;

        let outcome = ctx.local.game.run(
            &mut session,
            || timer.get_counter().ticks(),
            || ticker.lock(|t| t.arm()),
        );
        match outcome {
            Ok(hits) => defmt::info!("halted with {} points", hits),
            Err(err) => defmt::error!("round aborted: {}", err),
        }

        loop {
            cortex_m::asm::wfi();
        }
    }

    // Hardware Task: Timer Interrupt (1Hz)
    #[task(binds = TIMER_IRQ_0, priority = 1, shared = [session, ticker])]
    fn tick(mut ctx: tick::Context) {
        let outcome = ctx.shared.session.lock(|s| s.tick());

        ctx.shared.ticker.lock(|t| {
            t.alarm.clear_interrupt();
            match outcome {
                TickOutcome::Running => t.arm(),
                TickOutcome::Expired | TickOutcome::Idle => t.stop(),
            }
        });

        if outcome == TickOutcome::Expired {
            defmt::info!("time is up");
        }
    }
}
