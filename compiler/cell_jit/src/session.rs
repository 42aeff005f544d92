//! JIT session.
//!
//! A session walks four phases in order: initialize the native backend,
//! generate the program function, finalize it into executable memory, and
//! execute it once. Calling a phase out of order is a bug in the caller and
//! panics.

use cell_ir::{Program, StringInterner};
use cell_rt::{CellStore, RunContext};
use cranelift_codegen::ir::UserFuncName;
use cranelift_codegen::settings::{self, Configurable};
use cranelift_frontend::FunctionBuilderContext;
use cranelift_jit::{JITBuilder, JITModule};
use cranelift_module::{default_libcall_names, FuncId, Linkage, Module};
use tracing::{debug, instrument};

use crate::declare::{entry_signature, HelperIds};
use crate::runtime::{register_symbols, JitRuntime};
use crate::slots::{collect_store, describe_slots, CellSlot};
use crate::translate::{translate_program, Translation};
use crate::CodegenError;

/// Where a session is in its lifecycle.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SessionPhase {
    Idle,
    Initialized,
    Generated,
    Finalized,
    Executed,
}

struct Backend {
    module: JITModule,
    helpers: HelperIds,
}

/// Compiles one program to native code and runs it.
pub struct JitSession {
    phase: SessionPhase,
    backend: Option<Backend>,
    entry_id: Option<FuncId>,
    entry: *const u8,
    translation: Translation,
    ir_text: Option<String>,
}

type EntryFn = extern "C" fn(*mut CellSlot, *mut JitRuntime<'_>);

impl JitSession {
    pub fn new() -> Self {
        JitSession {
            phase: SessionPhase::Idle,
            backend: None,
            entry_id: None,
            entry: std::ptr::null(),
            translation: Translation::default(),
            ir_text: None,
        }
    }

    /// Compile and execute `program` in one go.
    pub fn run(program: &Program, ctx: &mut RunContext<'_>) -> Result<CellStore, CodegenError> {
        let mut session = JitSession::new();
        session.initialize()?;
        session.generate(program, ctx.interner)?;
        session.finalize()?;
        Ok(session.execute(ctx))
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Text of the generated function with its slot map, once generated.
    pub fn ir_text(&self) -> Option<&str> {
        self.ir_text.as_deref()
    }

    fn enter(&mut self, expected: SessionPhase, operation: &str) {
        assert!(
            self.phase == expected,
            "JIT session: `{operation}` called in phase {:?}, expected {expected:?}",
            self.phase
        );
    }

    /// Set up the native target and declare the runtime helpers.
    #[instrument(skip_all, level = "debug")]
    pub fn initialize(&mut self) -> Result<(), CodegenError> {
        self.enter(SessionPhase::Idle, "initialize");

        let mut flags = settings::builder();
        flags.set("use_colocated_libcalls", "false")?;
        flags.set("is_pic", "false")?;
        let isa = cranelift_native::builder()
            .map_err(CodegenError::UnsupportedHost)?
            .finish(settings::Flags::new(flags))?;
        debug!(triple = %isa.triple(), "native target ready");

        let mut builder = JITBuilder::with_isa(isa, default_libcall_names());
        register_symbols(&mut builder);
        let mut module = JITModule::new(builder);
        let helpers = HelperIds::declare(&mut module)?;

        self.backend = Some(Backend { module, helpers });
        self.phase = SessionPhase::Initialized;
        Ok(())
    }

    /// Translate, verify and define the program function.
    #[instrument(skip_all, level = "debug")]
    pub fn generate(
        &mut self,
        program: &Program,
        interner: &StringInterner,
    ) -> Result<(), CodegenError> {
        self.enter(SessionPhase::Initialized, "generate");
        let Some(backend) = self.backend.as_mut() else {
            panic!("JIT session: initialized without a backend");
        };
        let module = &mut backend.module;

        let mut ctx = module.make_context();
        ctx.func.signature = entry_signature(module);
        let id = module.declare_function("cell_main", Linkage::Local, &ctx.func.signature)?;
        ctx.func.name = UserFuncName::user(0, id.as_u32());

        let mut fctx = FunctionBuilderContext::new();
        let translation = translate_program(
            &mut ctx.func,
            &mut fctx,
            module,
            &backend.helpers,
            program,
            interner,
        )?;
        self.ir_text = Some(format!(
            "{}\n{}",
            describe_slots(translation.slots.names(), interner),
            ctx.func.display()
        ));

        cranelift_codegen::verify_function(&ctx.func, module.isa())
            .map_err(|errors| CodegenError::Verification(errors.to_string()))?;
        module.define_function(id, &mut ctx)?;
        module.clear_context(&mut ctx);

        debug!(
            slots = translation.slots.len(),
            statements = program.stmt_count(),
            "program function defined"
        );
        self.translation = translation;
        self.entry_id = Some(id);
        self.phase = SessionPhase::Generated;
        Ok(())
    }

    /// Resolve relocations and make the code executable.
    pub fn finalize(&mut self) -> Result<(), CodegenError> {
        self.enter(SessionPhase::Generated, "finalize");
        let (Some(backend), Some(id)) = (self.backend.as_mut(), self.entry_id) else {
            panic!("JIT session: generated without a function");
        };
        backend.module.finalize_definitions()?;
        self.entry = backend.module.get_finalized_function(id);
        self.phase = SessionPhase::Finalized;
        Ok(())
    }

    /// Run the program once against fresh cell storage.
    #[instrument(skip_all, level = "debug")]
    pub fn execute(&mut self, ctx: &mut RunContext<'_>) -> CellStore {
        self.enter(SessionPhase::Finalized, "execute");
        let names = self.translation.slots.names();
        let mut slots = vec![CellSlot::default(); names.len()];
        let mut rt = JitRuntime::new(
            names,
            &self.translation.reports,
            &self.translation.exports,
            &self.translation.call_sites,
            ctx.interner,
            &ctx.printer,
            &mut ctx.diagnostics,
        );

        // SAFETY: `entry` was finalized from a function declared with
        // `entry_signature`, and the module stays alive until `self` drops.
        let entry = unsafe { std::mem::transmute::<*const u8, EntryFn>(self.entry) };
        entry(slots.as_mut_ptr(), &mut rt);
        debug!(assignments = rt.clock, "compiled program finished");

        self.phase = SessionPhase::Executed;
        collect_store(&slots, names)
    }
}

impl Default for JitSession {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for JitSession {
    fn drop(&mut self) {
        if let Some(backend) = self.backend.take() {
            // SAFETY: the entry pointer never leaves the session.
            unsafe { backend.module.free_memory() };
        }
    }
}
